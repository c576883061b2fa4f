use crate::autofit::{fit_height, passes};
use crate::geometry::{Gesture, GestureEnd, Point};
use crate::models::{Note, NotePatch};
use crate::richtext::table::CellRef;
use crate::richtext::{
    content_from_doc, doc_from_content, doc_is_empty, import_markup, list_items_from_html,
    looks_like_markup, Block, Table,
};
use crate::state::{AppContext, NoteSyncController, SlotField};
use crate::util::px;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// One note on the board surface: draggable by its top strip, resizable at
/// the right edge, with a block-structured contenteditable body.
///
/// The body is rendered from a local block document. Typing mutates the
/// document untracked and never re-renders (the browser already updated
/// the DOM, and a re-render would reset the caret); only structural edits
/// (paste import, table commands, external writes through the store) bump
/// the version counter and rebuild the block views.
#[component]
pub fn NoteCard(note: RwSignal<Note>) -> impl IntoView {
    let app = expect_context::<AppContext>();
    let sync = expect_context::<NoteSyncController>();
    let store = app.0.store;
    let mode = app.0.mode;
    let gesture = app.0.gesture;
    let focused_cell = app.0.focused_cell;

    let id = note.with_untracked(|n| n.id);

    let doc = RwSignal::new(note.with_untracked(|n| doc_from_content(&n.content)));
    let last_serialized = RwSignal::new(note.with_untracked(|n| n.content.clone()));
    let version = RwSignal::new(0u32);
    let content_ref = NodeRef::<html::Div>::new();

    // Pick up content written by anything other than this card's own
    // editing (table commands, board reload). Own edits keep
    // `last_serialized` in step, so they fall through without a rebuild.
    Effect::new(move |_| {
        let content = note.with(|n| n.content.clone());
        if last_serialized.with_untracked(|s| *s != content) {
            doc.update_untracked(|d| *d = doc_from_content(&content));
            last_serialized.update_untracked(|s| *s = content);
            version.update(|v| *v += 1);
        }
    });

    let autofit = {
        let sync = sync.clone();
        move |persist: bool| {
            let Some(el) = content_ref.get_untracked() else {
                return;
            };
            let current = note.with_untracked(|n| n.height);
            if let Some(h) = fit_height(el.scroll_height() as f64, current) {
                store.upsert_local(id, &NotePatch::height(h));
                if persist {
                    sync.save_debounced(id, SlotField::Height, NotePatch::height(h));
                }
            }
        }
    };

    // Re-measure on a short schedule so late-loading embeds still get
    // room; only the last pass writes the height back.
    let schedule_autofit = {
        let autofit = autofit.clone();
        move || {
            for pass in passes() {
                if pass.delay_ms == 0 {
                    autofit(pass.persist);
                    continue;
                }
                let Some(win) = web_sys::window() else {
                    continue;
                };
                let autofit = autofit.clone();
                let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
                    autofit(pass.persist);
                });
                let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                    cb.as_ref().unchecked_ref(),
                    pass.delay_ms,
                );
            }
        }
    };

    {
        let schedule_autofit = schedule_autofit.clone();
        Effect::new(move |_| {
            if content_ref.get().is_some() {
                schedule_autofit();
            }
        });
    }

    // Typing path: the DOM is already current, so serialize the document,
    // mirror it into the store, and debounce the write.
    let commit_text = {
        let sync = sync.clone();
        move || {
            let content = doc.with_untracked(|d| content_from_doc(d));
            last_serialized.update_untracked(|s| *s = content.clone());
            store.upsert_local(id, &NotePatch::content(content.clone()));
            sync.save_debounced(id, SlotField::Content, NotePatch::content(content));
        }
    };

    // Structural path: replace the document, flush immediately, rebuild.
    let commit_structure = {
        let sync = sync.clone();
        let schedule_autofit = schedule_autofit.clone();
        move |new_doc: Vec<Block>| {
            let content = content_from_doc(&new_doc);
            doc.update_untracked(|d| *d = new_doc);
            last_serialized.update_untracked(|s| *s = content.clone());
            store.upsert_local(id, &NotePatch::content(content.clone()));
            sync.save_now(id, NotePatch::content(content));
            version.update(|v| *v += 1);
            schedule_autofit();
        }
    };

    let on_paste = {
        let commit_structure = commit_structure.clone();
        move |ev: web_sys::ClipboardEvent| {
            if !mode.get_untracked().is_edit() {
                return;
            }
            let Some(data) = ev.clipboard_data() else {
                return;
            };
            let Ok(text) = data.get_data("text/plain") else {
                return;
            };
            if !looks_like_markup(&text) {
                return;
            }
            ev.prevent_default();
            let imported = import_markup(&text);
            let mut new_doc = doc.with_untracked(|d| d.clone());
            if doc_is_empty(&new_doc) {
                new_doc = imported;
            } else {
                new_doc.extend(imported);
            }
            commit_structure(new_doc);
        }
    };

    // Leaving the note persists the settled content and height at once.
    let on_focusout = {
        let sync = sync.clone();
        move |_: web_sys::FocusEvent| {
            if let Some(el) = content_ref.get_untracked() {
                let current = note.with_untracked(|n| n.height);
                if let Some(h) = fit_height(el.scroll_height() as f64, current) {
                    store.upsert_local(id, &NotePatch::height(h));
                }
            }
            let mut patch = NotePatch::content(last_serialized.get_untracked());
            patch.merge(NotePatch::height(note.with_untracked(|n| n.height)));
            sync.save_now(id, patch);
        }
    };

    let activate = {
        let sync = sync.clone();
        move || {
            if let Some(z) = store.activate(id) {
                sync.save_now(id, NotePatch::z_index(z));
            }
        }
    };

    let on_card_down = {
        let activate = activate.clone();
        move |ev: web_sys::PointerEvent| {
            ev.stop_propagation();
            if !mode.get_untracked().is_edit() {
                return;
            }
            if store.active().get_untracked() != Some(id) {
                activate();
            }
        }
    };

    let on_handle_down = {
        let activate = activate.clone();
        move |ev: web_sys::PointerEvent| {
            if !mode.get_untracked().is_edit() {
                return;
            }
            ev.stop_propagation();
            ev.prevent_default();
            capture_pointer(&ev);
            let origin = note.with_untracked(|n| Point::new(n.x, n.y));
            gesture.set(Gesture::begin_drag(id, origin));
            activate();
        }
    };

    let on_resize_down = move |ev: web_sys::PointerEvent| {
        if !mode.get_untracked().is_edit() {
            return;
        }
        ev.stop_propagation();
        ev.prevent_default();
        capture_pointer(&ev);
        gesture.set(Gesture::begin_resize(id, note.with_untracked(|n| n.width)));
        activate();
    };

    // Intermediate movement only feeds the in-flight gesture.
    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        if gesture.with_untracked(|g| g.is_idle()) {
            return;
        }
        gesture.update(|g| g.track(ev.movement_x() as f64, ev.movement_y() as f64));
    };

    let finish_gesture = {
        let app = app.clone();
        let sync = sync.clone();
        move || {
            let ctx = app.0.board_context();
            let Some(end) = gesture.try_update(|g| g.finish(&ctx)).flatten() else {
                return;
            };
            match end {
                GestureEnd::Moved { id, position } => {
                    let patch = NotePatch::position(position.x, position.y);
                    store.upsert_local(id, &patch);
                    sync.save_now(id, patch);
                }
                GestureEnd::Resized { id, width } => {
                    let mut patch = NotePatch {
                        width: Some(width),
                        ..NotePatch::default()
                    };
                    if let Some(n) = store.snapshot(id) {
                        patch.x = Some(n.x);
                        patch.y = Some(n.y);
                    }
                    store.upsert_local(id, &patch);
                    sync.save_now(id, patch);
                }
            }
        }
    };
    let finish_up = {
        let f = finish_gesture.clone();
        move |_: web_sys::PointerEvent| f()
    };
    let finish_cancel = {
        let f = finish_gesture;
        move |_: web_sys::PointerEvent| f()
    };

    let style = move || {
        let n = note.get();
        let g = gesture.get();
        let (mut x, mut y) = (n.x, n.y);
        if let Some(d) = g.drag_offset(id) {
            x += d.x;
            y += d.y;
        }
        let w = g.resize_width(id).unwrap_or(n.width);
        format!(
            "left:{};top:{};width:{};min-height:{};background:{};z-index:{}",
            px(x),
            px(y),
            px(w),
            px(n.height),
            n.color,
            n.z_index,
        )
    };

    let render_blocks = {
        let commit_text = commit_text.clone();
        let autofit = autofit.clone();
        move || {
            version.get();
            let blocks = doc.with_untracked(|d| d.clone());
            if blocks.is_empty() {
                return vec![empty_paragraph(doc, mode, focused_cell, &commit_text, &autofit)];
            }
            blocks
                .into_iter()
                .enumerate()
                .map(|(i, block)| {
                    block_view(i, block, doc, mode, focused_cell, &commit_text, &autofit)
                })
                .collect::<Vec<_>>()
        }
    };

    view! {
        <div
            class="absolute flex flex-col rounded-sm shadow-md"
            class=("ring-2", move || store.active().get() == Some(id))
            class=("ring-blue-400", move || store.active().get() == Some(id))
            class=("pointer-events-none", move || !mode.get().is_edit())
            style=style
            on:pointerdown=on_card_down
        >
            <div
                class="h-4 shrink-0 cursor-move select-none rounded-t-sm bg-black/10"
                on:pointerdown=on_handle_down
                on:pointermove=on_pointer_move
                on:pointerup=finish_up.clone()
                on:pointercancel=finish_cancel.clone()
            ></div>

            <div
                node_ref=content_ref
                class="grow break-words px-2 py-1 text-sm leading-snug"
                on:paste=on_paste
                on:focusout=on_focusout
            >
                {render_blocks}
            </div>

            <div
                class="absolute inset-y-0 right-0 w-1.5 cursor-ew-resize"
                on:pointerdown=on_resize_down
                on:pointermove=on_pointer_move
                on:pointerup=finish_up
                on:pointercancel=finish_cancel
            ></div>
        </div>
    }
}

type FocusedCell = RwSignal<Option<CellRef>>;

fn capture_pointer(ev: &web_sys::PointerEvent) {
    if let Some(el) = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
    {
        let _ = el.set_pointer_capture(ev.pointer_id());
    }
}

/// Inner HTML of the element an input event fired on.
fn event_html(ev: &web_sys::Event) -> Option<String> {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
        .map(|el| el.inner_html())
}

/// Seed paragraph for a note with no content yet; first keystroke creates
/// the block.
fn empty_paragraph(
    doc: RwSignal<Vec<Block>>,
    mode: RwSignal<crate::state::BoardMode>,
    focused_cell: FocusedCell,
    commit_text: &(impl Fn() + Clone + 'static),
    autofit: &(impl Fn(bool) + Clone + 'static),
) -> AnyView {
    let commit_text = commit_text.clone();
    let autofit = autofit.clone();
    view! {
        <div
            class="min-h-4 outline-none"
            contenteditable=move || mode.get().is_edit()
            on:focus=move |_| focused_cell.set(None)
            on:input=move |ev| {
                if let Some(html) = event_html(&ev) {
                    doc.update_untracked(|d| {
                        if let Some(Block::Paragraph { text }) = d.get_mut(0) {
                            *text = html;
                        } else {
                            d.insert(0, Block::Paragraph { text: html });
                        }
                    });
                    commit_text();
                    autofit(true);
                }
            }
        ></div>
    }
    .into_any()
}

fn block_view(
    i: usize,
    block: Block,
    doc: RwSignal<Vec<Block>>,
    mode: RwSignal<crate::state::BoardMode>,
    focused_cell: FocusedCell,
    commit_text: &(impl Fn() + Clone + 'static),
    autofit: &(impl Fn(bool) + Clone + 'static),
) -> AnyView {
    let commit_text = commit_text.clone();
    let autofit = autofit.clone();
    match block {
        Block::Heading { level, text } => {
            let class = match level {
                1 => "text-xl font-bold outline-none",
                2 => "text-lg font-bold outline-none",
                _ => "font-semibold outline-none",
            };
            view! {
                <div
                    class=class
                    contenteditable=move || mode.get().is_edit()
                    inner_html=text
                    on:focus=move |_| focused_cell.set(None)
                    on:input=move |ev| {
                        if let Some(html) = event_html(&ev) {
                            doc.update_untracked(|d| {
                                if let Some(Block::Heading { text, .. }) = d.get_mut(i) {
                                    *text = html;
                                }
                            });
                            commit_text();
                            autofit(true);
                        }
                    }
                ></div>
            }
            .into_any()
        }
        Block::Paragraph { text } => view! {
            <div
                class="min-h-4 outline-none"
                contenteditable=move || mode.get().is_edit()
                inner_html=text
                on:focus=move |_| focused_cell.set(None)
                on:input=move |ev| {
                    if let Some(html) = event_html(&ev) {
                        doc.update_untracked(|d| {
                            if let Some(Block::Paragraph { text }) = d.get_mut(i) {
                                *text = html;
                            }
                        });
                        commit_text();
                        autofit(true);
                    }
                }
            ></div>
        }
        .into_any(),
        Block::List { items } => {
            let html: String = items
                .iter()
                .map(|item| format!("<li>{item}</li>"))
                .collect();
            view! {
                <ul
                    class="list-disc pl-5 outline-none"
                    contenteditable=move || mode.get().is_edit()
                    inner_html=html
                    on:focus=move |_| focused_cell.set(None)
                    on:input=move |ev| {
                        if let Some(html) = event_html(&ev) {
                            let items = list_items_from_html(&html);
                            doc.update_untracked(|d| {
                                if let Some(Block::List { items: existing }) = d.get_mut(i) {
                                    *existing = items;
                                }
                            });
                            commit_text();
                            autofit(true);
                        }
                    }
                ></ul>
            }
            .into_any()
        }
        Block::Table(table) => {
            table_view(i, table, doc, mode, focused_cell, commit_text, autofit)
        }
    }
}

fn table_view(
    i: usize,
    table: Table,
    doc: RwSignal<Vec<Block>>,
    mode: RwSignal<crate::state::BoardMode>,
    focused_cell: FocusedCell,
    commit_text: impl Fn() + Clone + 'static,
    autofit: impl Fn(bool) + Clone + 'static,
) -> AnyView {
    let Table {
        alignments,
        header,
        rows,
    } = table;

    let header_cells = header
        .into_iter()
        .enumerate()
        .map(|(c, cell)| {
            let align = alignments.get(c).copied().unwrap_or_default();
            let commit_text = commit_text.clone();
            let autofit = autofit.clone();
            view! {
                <th
                    class="border border-zinc-400/60 px-1 font-semibold outline-none"
                    style=format!("text-align:{}", align.css())
                    contenteditable=move || mode.get().is_edit()
                    inner_html=cell
                    on:focus=move |_| {
                        focused_cell.set(Some(CellRef { block: i, row: None, col: c }))
                    }
                    on:input=move |ev| {
                        if let Some(html) = event_html(&ev) {
                            doc.update_untracked(|d| {
                                if let Some(Block::Table(t)) = d.get_mut(i) {
                                    if let Some(cell) = t.header.get_mut(c) {
                                        *cell = html;
                                    }
                                }
                            });
                            commit_text();
                            autofit(true);
                        }
                    }
                ></th>
            }
        })
        .collect_view();

    let body_rows = rows
        .into_iter()
        .enumerate()
        .map(|(r, row)| {
            let cells = row
                .into_iter()
                .enumerate()
                .map(|(c, cell)| {
                    let align = alignments.get(c).copied().unwrap_or_default();
                    let commit_text = commit_text.clone();
                    let autofit = autofit.clone();
                    view! {
                        <td
                            class="border border-zinc-400/60 px-1 outline-none"
                            style=format!("text-align:{}", align.css())
                            contenteditable=move || mode.get().is_edit()
                            inner_html=cell
                            on:focus=move |_| {
                                focused_cell.set(Some(CellRef { block: i, row: Some(r), col: c }))
                            }
                            on:input=move |ev| {
                                if let Some(html) = event_html(&ev) {
                                    doc.update_untracked(|d| {
                                        if let Some(Block::Table(t)) = d.get_mut(i) {
                                            if let Some(cell) =
                                                t.rows.get_mut(r).and_then(|row| row.get_mut(c))
                                            {
                                                *cell = html;
                                            }
                                        }
                                    });
                                    commit_text();
                                    autofit(true);
                                }
                            }
                        ></td>
                    }
                })
                .collect_view();
            view! { <tr>{cells}</tr> }
        })
        .collect_view();

    view! {
        <table class="w-full border-collapse text-xs">
            <thead>
                <tr>{header_cells}</tr>
            </thead>
            <tbody>{body_rows}</tbody>
        </table>
    }
    .into_any()
}
