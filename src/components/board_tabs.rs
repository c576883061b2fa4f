use crate::components::color_picker::{SwatchGrid, BOARD_SWATCHES};
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::state::{AppContext, BoardMode, BoardUiActions};
use leptos::prelude::*;

/// Header chrome: board tabs plus the board-level controls.
#[component]
pub fn BoardTabs() -> impl IntoView {
    let app = expect_context::<AppContext>();
    let actions = expect_context::<BoardUiActions>();

    let boards = app.0.boards;
    let current_id = app.0.current_board_id;
    let mode = app.0.mode;
    let show_board_colors = RwSignal::new(false);

    let snapping = {
        let app = app.clone();
        move || app.0.current_board().map(|b| b.snapping).unwrap_or(true)
    };
    let has_board = move || current_id.get().is_some();

    let pick_board_color = move |hex: String| {
        actions.set_board_color.run(hex);
        show_board_colors.set(false);
    };

    view! {
        <header class="flex flex-wrap items-center gap-1 border-b border-zinc-200 bg-zinc-50 px-2 py-1">
            <nav class="flex flex-wrap items-center gap-1">
                <For
                    each=move || boards.get()
                    key=|b| b.id
                    children=move |board| {
                        let id = board.id;
                        let color = board.background();
                        view! {
                            <button
                                class="rounded-t-md border-b-2 px-3 py-1 text-sm hover:bg-zinc-100"
                                class=("font-semibold", move || current_id.get() == Some(id))
                                class=(
                                    "border-transparent",
                                    move || current_id.get() != Some(id),
                                )
                                style=(
                                    "border-bottom-color",
                                    move || {
                                        if current_id.get() == Some(id) {
                                            color.clone()
                                        } else {
                                            String::new()
                                        }
                                    },
                                )
                                on:click=move |_| actions.select_board.run(id)
                            >
                                {board.name.clone()}
                            </button>
                        }
                    }
                />
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    on:click=move |_| actions.create_board.run(())
                >
                    "+"
                </Button>
            </nav>

            <div class="ms-auto flex items-center gap-1">
                <Show when=has_board>
                    <div class="relative">
                        <Show when=move || show_board_colors.get()>
                            <div class="absolute end-0 top-9 z-50">
                                <SwatchGrid
                                    swatches=BOARD_SWATCHES
                                    on_pick=pick_board_color.clone()
                                />
                            </div>
                        </Show>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            on:click=move |_| show_board_colors.update(|v| *v = !*v)
                        >
                            "Background"
                        </Button>
                    </div>

                    <label class="flex items-center gap-1 px-1 text-sm text-zinc-600">
                        <input
                            type="checkbox"
                            prop:checked=snapping.clone()
                            on:change=move |_| actions.toggle_snap.run(())
                        />
                        "Snap"
                    </label>

                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| actions.toggle_mode.run(())
                    >
                        {move || match mode.get() {
                            BoardMode::Edit => "Scroll mode",
                            BoardMode::Scroll => "Edit mode",
                        }}
                    </Button>

                    <Button
                        variant=ButtonVariant::Default
                        size=ButtonSize::Sm
                        on:click=move |_| actions.add_note.run(())
                    >
                        "New note"
                    </Button>

                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| {
                            if let Some(id) = current_id.get_untracked() {
                                actions.rename_board.run(id);
                            }
                        }
                    >
                        "Rename"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| {
                            if let Some(id) = current_id.get_untracked() {
                                actions.duplicate_board.run(id);
                            }
                        }
                    >
                        "Duplicate"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| {
                            if let Some(id) = current_id.get_untracked() {
                                actions.delete_board.run(id);
                            }
                        }
                    >
                        "Delete"
                    </Button>
                </Show>
            </div>
        </header>
    }
}
