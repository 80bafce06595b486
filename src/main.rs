use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

mod api;
mod auth;
mod cache;
mod charts;
mod config;
mod export;
mod model;
mod pages;

use auth::AuthError;
use pages::{DashboardPage, LoginPage, StatisticsPage, TablePage};

const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, PartialEq)]
enum AuthStatus {
    Checking,
    Authenticated,
    Unauthenticated,
}

#[derive(Clone, Copy, PartialEq)]
enum Page {
    Dashboard,
    Statistics,
    Table,
}

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    Receipt,
    TrendingUp,
    TrendingDown,
    Wallet,
}

fn load_theme() -> String {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(saved)) = storage.get_item(THEME_KEY) {
                if saved == "dark" {
                    return saved;
                }
            }
        }
    }
    "light".to_string()
}

fn save_theme(mode: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(THEME_KEY, mode);
        }
    }
}

fn apply_theme(mode: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Some(body) = document.body() {
                let _ = body.class_list().toggle_with_force("dark", mode == "dark");
            }
        }
    }
}

#[derive(Properties, PartialEq)]
struct LayoutProps {
    children: Children,
    active_page: Page,
    on_select: Callback<Page>,
    theme: String,
    on_toggle_theme: Callback<()>,
}

#[function_component(Layout)]
fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar active_page={props.active_page} on_select={props.on_select.clone()} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header theme={props.theme.clone()} on_toggle_theme={props.on_toggle_theme.clone()} />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    theme: String,
    on_toggle_theme: Callback<()>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let on_toggle = {
        let on_toggle_theme = props.on_toggle_theme.clone();
        Callback::from(move |_| on_toggle_theme.emit(()))
    };

    // Drops the cached records so the next load hits the store again.
    let on_refresh = Callback::from(move |_| {
        cache::clear(cache::ENTRIES_KEY);
        cache::clear(cache::CATEGORIES_KEY);
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    });

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <div class="flex items-center gap-2">
                <button class="p-2 hover:bg-secondary rounded-full transition-colors" aria-label="Toggle theme" onclick={on_toggle}>
                    { if props.theme == "dark" { icon_sun() } else { icon_moon() } }
                </button>
                <button class="p-2 hover:bg-secondary rounded-full transition-colors" aria-label="Reload records" onclick={on_refresh}>
                    { icon_refresh() }
                </button>
            </div>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let nav_items = vec![
        NavItem {
            label: "Dashboard",
            page: Page::Dashboard,
            icon: icon_layout_grid,
        },
        NavItem {
            label: "Statistics",
            page: Page::Statistics,
            icon: icon_bar_chart,
        },
        NavItem {
            label: "Table",
            page: Page::Table,
            icon: icon_table,
        },
    ];

    let on_logout = Callback::from(move |_| {
        auth::clear_session();
        cache::clear(cache::ENTRIES_KEY);
        cache::clear(cache::CATEGORIES_KEY);
        log::info!("signed out");
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    });

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <div class="w-12 h-12 bg-[#173E63] rounded-full flex items-center justify-center text-white font-black text-xl">
                    {"T"}
                </div>
                <span class="text-[#173E63] text-2xl font-black tracking-tight">{"Tally"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for nav_items.iter().map(|item| {
                        let is_active = item.page == props.active_page;
                        let class_name = if is_active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let page = item.page;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(page))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"Log Out"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    pub value: String,
    pub icon: StatIcon,
    #[prop_or(false)]
    pub danger: bool,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    let value_class = if props.danger {
        "text-2xl font-bold text-red-600 tracking-tight"
    } else {
        "text-2xl font-bold text-[#1D617A] tracking-tight"
    };
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title }</p>
                <h3 class={value_class}>{ props.value.clone() }</h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::Receipt => icon_receipt(),
                        StatIcon::TrendingUp => icon_trending_up(),
                        StatIcon::TrendingDown => icon_trending_down(),
                        StatIcon::Wallet => icon_wallet(),
                    }
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    pub message: String,
    #[prop_or(false)]
    pub is_error: bool,
}

#[function_component(Notice)]
pub fn notice(props: &NoticeProps) -> Html {
    let class = if props.is_error {
        "p-3 rounded-lg bg-red-50 border border-red-200 text-red-700 text-sm"
    } else {
        "p-3 rounded-lg bg-green-50 border border-green-200 text-green-700 text-sm"
    };
    html! {
        <div class={class}>{ props.message.clone() }</div>
    }
}

#[function_component(App)]
fn app() -> Html {
    let active_page = use_state(|| Page::Dashboard);
    let auth_status = use_state(|| AuthStatus::Checking);
    let theme = use_state(load_theme);

    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    {
        let mode = (*theme).clone();
        use_effect_with_deps(
            move |mode: &String| {
                apply_theme(mode);
                || ()
            },
            mode,
        );
    }

    {
        let auth_status = auth_status.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let Some(session) = auth::load_session() else {
                        auth_status.set(AuthStatus::Unauthenticated);
                        return;
                    };
                    if !auth::is_allowed(&session.email) {
                        auth::clear_session();
                        auth_status.set(AuthStatus::Unauthenticated);
                        return;
                    }
                    match auth::refresh(&session).await {
                        Ok(renewed) => {
                            auth::save_session(&renewed);
                            auth_status.set(AuthStatus::Authenticated);
                        }
                        Err(AuthError::Provider(message)) => {
                            log::warn!("stored session rejected: {message}");
                            auth::clear_session();
                            auth_status.set(AuthStatus::Unauthenticated);
                        }
                        Err(err) => {
                            log::warn!("session refresh failed: {err}");
                            // Fall back to the stored token (keeps the user
                            // signed in while the provider is unreachable).
                            if session.id_token.is_empty() {
                                auth_status.set(AuthStatus::Unauthenticated);
                            } else {
                                auth_status.set(AuthStatus::Authenticated);
                            }
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_| {
            let next = if *theme == "dark" { "light" } else { "dark" };
            save_theme(next);
            theme.set(next.to_string());
        })
    };

    let content = match *active_page {
        Page::Dashboard => html! { <DashboardPage /> },
        Page::Statistics => html! { <StatisticsPage /> },
        Page::Table => html! { <TablePage /> },
    };

    if *auth_status == AuthStatus::Checking {
        return html! {
            <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                {"Checking session..."}
            </div>
        };
    }

    if *auth_status == AuthStatus::Unauthenticated {
        return html! { <LoginPage on_authenticated={Callback::from(move |_| auth_status.set(AuthStatus::Authenticated))} /> };
    }

    html! {
        <Layout
            active_page={*active_page}
            on_select={on_select}
            theme={(*theme).clone()}
            on_toggle_theme={on_toggle_theme}
        >
            { content }
        </Layout>
    }
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="text-foreground">
            <path d={path}></path>
        </svg>
    }
}

fn icon_moon() -> Html {
    icon_base("M21 12.79A9 9 0 1111.21 3a7 7 0 109.79 9.79z")
}
fn icon_sun() -> Html {
    icon_base("M12 3v2M12 19v2M5.6 5.6l1.4 1.4M17 17l1.4 1.4M3 12h2M19 12h2M5.6 18.4l1.4-1.4M17 7l1.4-1.4M12 8a4 4 0 100 8 4 4 0 100-8")
}
fn icon_refresh() -> Html {
    icon_base("M23 4v6h-6M1 20v-6h6M3.51 9a9 9 0 0114.85-3.36L23 10M1 14l4.64 4.36A9 9 0 0020.49 15")
}
fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
fn icon_bar_chart() -> Html {
    icon_base("M4 20V10M10 20V4M16 20v-6M22 20H2")
}
fn icon_table() -> Html {
    icon_base("M3 3h18v18H3zM3 9h18M9 21V9")
}
fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
fn icon_trending_up() -> Html {
    icon_base("M3 17l6-6 4 4 7-7")
}
fn icon_trending_down() -> Html {
    icon_base("M3 7l6 6 4-4 7 7")
}
fn icon_receipt() -> Html {
    icon_base("M4 2v20l2-1 2 1 2-1 2 1 2-1 2 1 2-1 2 1V2l-2 1-2-1-2 1-2-1-2 1-2-1-2 1zM8 7h8M8 11h8M8 15h5")
}
fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
pub fn icon_trash() -> Html {
    icon_base("M3 6h18M8 6V4h8v2M19 6l-1 14H6L5 6M10 11v6M14 11v6")
}
pub fn icon_download() -> Html {
    icon_base("M21 15v4a2 2 0 01-2 2H5a2 2 0 01-2-2v-4M7 10l5 5 5-5M12 15V3")
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
