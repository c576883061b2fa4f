use leptos::prelude::*;

/// Note background palette (warm-to-cool rows).
pub(crate) const NOTE_SWATCHES: &[&str] = &[
    "#FB6E6E", "#FFBBBB", "#FFE3E3", "#FDAA52", "#FFCD9A", "#FFE8D1", "#FDEA52", "#FFF4A0",
    "#FFFAD1", "#B7EB40", "#D6F392", "#F1FFD2", "#41DBDB", "#B5EBEB", "#DBF5F5", "#51AFE7",
    "#ABD8F3", "#E6F6FF", "#B972F5", "#D4ABF7", "#EBDCF7",
];

/// Board background palette (muted pastels).
pub(crate) const BOARD_SWATCHES: &[&str] = &[
    "#E8E7E7", "#FFE1E1", "#FFF0E1", "#FFFDE1", "#EBFFE1", "#E1FDFF", "#E1F4FF", "#EAE1FF",
    "#FEE1FF", "#FFE1F2",
];

#[component]
pub fn SwatchGrid(
    swatches: &'static [&'static str],
    #[prop(into)] on_pick: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="grid grid-cols-7 gap-1 rounded-md border border-zinc-200 bg-white p-2 shadow-lg">
            {swatches
                .iter()
                .map(|hex| {
                    let hex = *hex;
                    view! {
                        <button
                            class="size-6 rounded border border-zinc-300 transition-transform hover:scale-110"
                            style=format!("background:{hex}")
                            title=hex
                            on:click=move |_| on_pick.run(hex.to_string())
                        ></button>
                    }
                })
                .collect_view()}
        </div>
    }
}
