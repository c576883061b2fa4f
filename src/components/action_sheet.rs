use crate::components::color_picker::{SwatchGrid, NOTE_SWATCHES};
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::NotePatch;
use crate::richtext::table::{
    delete_column, delete_row, insert_column_right, insert_row_below, CellRef,
};
use crate::richtext::{content_from_doc, doc_from_content, Block};
use crate::state::{AppContext, BoardUiActions, NoteSyncController};
use leptos::prelude::*;

type TableOp = fn(&mut Vec<Block>, Option<CellRef>) -> bool;

/// Bottom action bar for the active note: color, copy/paste/delete, and
/// the table commands. Only reachable in edit mode.
#[component]
pub fn ActionSheet() -> impl IntoView {
    let app = expect_context::<AppContext>();
    let sync = expect_context::<NoteSyncController>();
    let actions = expect_context::<BoardUiActions>();

    let store = app.0.store;
    let mode = app.0.mode;
    let focused_cell = app.0.focused_cell;
    let show_colors = RwSignal::new(false);

    let visible = move || store.active().get().is_some() && mode.get().is_edit();

    let sync2 = sync.clone();
    let apply_table_op = Callback::new(move |op: TableOp| {
        let Some(id) = store.active().get_untracked() else {
            return;
        };
        let Some(note) = store.snapshot(id) else {
            return;
        };
        let mut doc = doc_from_content(&note.content);
        if !op(&mut doc, focused_cell.get_untracked()) {
            return;
        }
        let content = content_from_doc(&doc);
        store.upsert_local(id, &NotePatch::content(content.clone()));
        // Structural edits are terminal events; flush immediately.
        sync2.save_now(id, NotePatch::content(content));
    });
    let op1 = apply_table_op;
    let op2 = apply_table_op;
    let op3 = apply_table_op;
    let op4 = apply_table_op;

    let pick_color = Callback::new(move |hex: String| {
        let Some(id) = store.active().get_untracked() else {
            return;
        };
        store.upsert_local(id, &NotePatch::color(hex.clone()));
        sync.save_now(id, NotePatch::color(hex));
        show_colors.set(false);
    });

    view! {
        <Show when=visible>
            <div class="fixed inset-x-0 bottom-0 z-50 border-t border-zinc-200 bg-white/95 px-3 py-2 shadow-[0_-4px_12px_rgba(0,0,0,0.08)]">
                <div class="relative mx-auto flex max-w-3xl flex-wrap items-center justify-center gap-1">
                    <Show when=move || show_colors.get()>
                        <div class="absolute bottom-12 left-1/2 -translate-x-1/2">
                            <SwatchGrid swatches=NOTE_SWATCHES on_pick=pick_color />
                        </div>
                    </Show>

                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| show_colors.update(|v| *v = !*v)
                    >
                        "Color"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| actions.copy_note.run(())
                    >
                        "Copy"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| actions.paste_note.run(())
                    >
                        "Paste"
                    </Button>

                    <span class="mx-1 h-5 w-px bg-zinc-200"></span>

                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| op1.run(insert_row_below)
                    >
                        "Row below"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| op2.run(insert_column_right)
                    >
                        "Col right"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| op3.run(delete_row)
                    >
                        "Del row"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| op4.run(delete_column)
                    >
                        "Del col"
                    </Button>

                    <span class="mx-1 h-5 w-px bg-zinc-200"></span>

                    <Button
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Sm
                        on:click=move |_| actions.delete_note.run(())
                    >
                        "Delete"
                    </Button>
                </div>
            </div>
        </Show>
    }
}
