use crate::components::note_card::NoteCard;
use crate::geometry::Point;
use crate::models::{Note, DEFAULT_BOARD_COLOR};
use crate::state::AppContext;
use crate::util::px;
use leptos::html;
use leptos::prelude::*;

/// Scrollable board surface. Notes position themselves absolutely inside
/// it; an invisible spacer keeps the surface scrollable past the last
/// note.
#[component]
pub fn BoardSurface() -> impl IntoView {
    let app = expect_context::<AppContext>();
    let store = app.0.store;
    let pointer_session = app.0.pointer_session;
    let focused_cell = app.0.focused_cell;
    let surface_ref = NodeRef::<html::Div>::new();

    let background = {
        let app = app.clone();
        move || {
            app.0
                .current_board()
                .map(|b| b.background())
                .unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string())
        }
    };

    // A click that reaches the surface deselects, and its board-space
    // position becomes the drop point for the next created or pasted note.
    let on_surface_down = move |ev: web_sys::PointerEvent| {
        if let Some(el) = surface_ref.get_untracked() {
            let rect = el.get_bounding_client_rect();
            let x = f64::from(ev.client_x()) - rect.left() + f64::from(el.scroll_left());
            let y = f64::from(ev.client_y()) - rect.top() + f64::from(el.scroll_top());
            pointer_session.update(|s| s.record_click(Point::new(x, y)));
        }
        store.clear_active();
        focused_cell.set(None);
    };

    let spacer = Note::spacer();
    let spacer_style = format!(
        "left:{};top:{};width:{};height:{}",
        px(spacer.x),
        px(spacer.y),
        px(spacer.width),
        px(spacer.height),
    );

    view! {
        <div
            node_ref=surface_ref
            class="relative grow overflow-auto"
            style=("background", background)
            on:pointerdown=on_surface_down
        >
            <For
                each=move || store.entries()
                key=|sig| sig.with_untracked(|n| n.id)
                children=move |sig| view! { <NoteCard note=sig /> }
            />
            <div class="pointer-events-none absolute" style=spacer_style></div>
        </div>
    }
}
