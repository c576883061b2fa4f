use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-all disabled:pointer-events-none disabled:opacity-50 shrink-0 outline-none focus-visible:ring-2 focus-visible:ring-zinc-400 w-fit hover:cursor-pointer active:scale-[0.98] touch-manipulation [-webkit-tap-highlight-color:transparent] select-none",
        variants: {
            variant: {
                Default: "bg-zinc-900 text-zinc-50 shadow-xs hover:bg-zinc-700",
                Destructive: "bg-red-600 text-white shadow-xs hover:bg-red-500",
                Outline: "border border-zinc-300 bg-white shadow-xs hover:bg-zinc-100",
                Ghost: "hover:bg-zinc-200/70 text-zinc-700",
            },
            size: {
                Default: "h-9 px-4 py-2",
                Sm: "h-8 rounded-md gap-1.5 px-3",
                Icon: "size-9",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
