use wasm_bindgen_futures::spawn_local;
use web_sys::InputEvent;
use yew::prelude::*;

use crate::model::{self, Entry, EntryFilter};
use crate::{api, export, icon_download, page_shell, Notice, StatCard, StatIcon};

const PAGE_SIZE: usize = 6;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Full record grid. Always fetches fresh so the table reflects the store,
/// not the cache.
#[function_component(TablePage)]
pub fn table_page() -> Html {
    let entries = use_state(Vec::<Entry>::new);
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let notice = use_state(|| None::<(String, bool)>);
    let grid_page = use_state(|| 0usize);

    let filter_from = use_state(|| "".to_string());
    let filter_to = use_state(|| "".to_string());
    let filter_category = use_state(|| "".to_string());
    let search = use_state(|| "".to_string());

    {
        let entries = entries.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_entries().await {
                        Ok(mut fetched) => {
                            model::sort_ascending(&mut fetched);
                            entries.set(fetched);
                        }
                        Err(err) => {
                            log::error!("failed to load entries: {err}");
                            load_error.set(Some("Could not load the records.".to_string()));
                        }
                    }
                    loading.set(false);
                });
                || ()
            },
            (),
        );
    }

    if *loading {
        return page_shell(
            "Table",
            html! {},
            html! {
                <div class="flex items-center justify-center py-24 text-muted-foreground">
                    {"Loading records..."}
                </div>
            },
        );
    }

    if let Some(message) = &*load_error {
        return page_shell(
            "Table",
            html! {},
            html! { <Notice message={message.clone()} is_error={true} /> },
        );
    }

    let categories = model::categories(&entries);

    let filter = EntryFilter {
        from: (*filter_from).clone(),
        to: (*filter_to).clone(),
        category: (*filter_category).clone(),
        search: (*search).clone(),
    };
    let filtered = filter.apply(&entries);

    let totals = model::totals(&filtered);
    let initial = model::initial_balance(&entries);
    let balance = initial + totals.income - totals.expense;

    let page_count = (filtered.len() + PAGE_SIZE - 1) / PAGE_SIZE;
    let current_page = (*grid_page).min(page_count.saturating_sub(1));
    let page_rows: Vec<Entry> = filtered
        .iter()
        .skip(current_page * PAGE_SIZE)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    let on_prev_page = {
        let grid_page = grid_page.clone();
        Callback::from(move |_| grid_page.set(current_page.saturating_sub(1)))
    };
    let on_next_page = {
        let grid_page = grid_page.clone();
        Callback::from(move |_| {
            if current_page + 1 < page_count {
                grid_page.set(current_page + 1);
            }
        })
    };

    let on_export = {
        let filtered = filtered.clone();
        let notice = notice.clone();
        Callback::from(move |_| match export::entries_to_csv(&filtered) {
            Ok(contents) => export::download_csv(export::EXPORT_FILENAME, &contents),
            Err(err) => {
                log::error!("failed to build csv: {err}");
                notice.set(Some(("Could not export the records.".to_string(), true)));
            }
        })
    };

    let reset_page = |handle: UseStateHandle<String>, grid_page: UseStateHandle<usize>| {
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
            grid_page.set(0);
        })
    };

    page_shell(
        "Table",
        html! {
            <button onclick={on_export} class="flex items-center gap-2 bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all">
                { icon_download() }
                {"Export CSV"}
            </button>
        },
        html! {
            <>
                { if let Some((message, is_error)) = &*notice {
                    html! { <Notice message={message.clone()} is_error={*is_error} /> }
                } else { html!{} } }

                <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
                    <StatCard title="Entries" value={totals.count.to_string()} icon={StatIcon::Receipt} />
                    <StatCard title="Total Income" value={model::format_amount(totals.income)} icon={StatIcon::TrendingUp} />
                    <StatCard title="Total Expense" value={model::format_amount(totals.expense)} icon={StatIcon::TrendingDown} />
                    <StatCard title="Current Balance" value={model::format_amount(balance)} icon={StatIcon::Wallet} danger={balance < 0.0} />
                </div>

                <div class="bg-card rounded-[10px] p-4 border border-border">
                    <div class="grid grid-cols-1 md:grid-cols-4 gap-3">
                        <div class="space-y-1">
                            <label class="text-[12px] font-bold text-muted-foreground">{"Search"}</label>
                            <input type="text" placeholder="Description or category" value={(*search).clone()}
                                oninput={reset_page(search.clone(), grid_page.clone())}
                                class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                        </div>
                        <div class="space-y-1">
                            <label class="text-[12px] font-bold text-muted-foreground">{"From"}</label>
                            <input type="date" value={(*filter_from).clone()}
                                oninput={reset_page(filter_from.clone(), grid_page.clone())}
                                class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                        </div>
                        <div class="space-y-1">
                            <label class="text-[12px] font-bold text-muted-foreground">{"To"}</label>
                            <input type="date" value={(*filter_to).clone()}
                                oninput={reset_page(filter_to.clone(), grid_page.clone())}
                                class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                        </div>
                        <div class="space-y-1">
                            <label class="text-[12px] font-bold text-muted-foreground">{"Category"}</label>
                            <select onchange={{
                                let filter_category = filter_category.clone();
                                let grid_page = grid_page.clone();
                                Callback::from(move |e: Event| {
                                    let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
                                    filter_category.set(input.value());
                                    grid_page.set(0);
                                })
                            }} class="w-full bg-[#f1f4f9] border-2 border-transparent rounded-[10px] px-3 py-2 text-[11px] focus:ring-2 focus:ring-[#1D617A] outline-none">
                                <option value="" selected={filter_category.is_empty()}>{"All"}</option>
                                { for categories.iter().map(|category| html! {
                                    <option value={category.clone()} selected={*filter_category == *category}>{ category.clone() }</option>
                                }) }
                            </select>
                        </div>
                    </div>
                </div>

                <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-8 py-4 font-bold">{"Date"}</th>
                                    <th class="px-8 py-4 font-bold text-right">{"Amount"}</th>
                                    <th class="px-8 py-4 font-bold">{"Category"}</th>
                                    <th class="px-8 py-4 font-bold">{"Description"}</th>
                                    <th class="px-8 py-4 font-bold">{"Income"}</th>
                                    <th class="px-8 py-4 font-bold">{"Expense"}</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                { if page_rows.is_empty() {
                                    html! { <tr><td colspan="6" class="px-8 py-6 text-center text-muted-foreground">{"No matching records."}</td></tr> }
                                } else {
                                    html! {
                                        <>
                                            { for page_rows.iter().map(|entry| html! {
                                                <tr key={entry.id.clone()} class="text-sm hover:bg-muted/40 transition-colors">
                                                    <td class="px-8 py-4 text-muted-foreground">{ if entry.date.is_empty() { "—" } else { entry.date.as_str() } }</td>
                                                    <td class="px-8 py-4 text-right font-semibold text-foreground">{ model::format_amount(entry.amount) }</td>
                                                    <td class="px-8 py-4">
                                                        <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">{ &entry.category }</span>
                                                    </td>
                                                    <td class="px-8 py-4 text-foreground">{ &entry.description }</td>
                                                    <td class="px-8 py-4 text-muted-foreground">{ yes_no(entry.income) }</td>
                                                    <td class="px-8 py-4 text-muted-foreground">{ yes_no(entry.expense) }</td>
                                                </tr>
                                            }) }
                                        </>
                                    }
                                }}
                            </tbody>
                        </table>
                    </div>
                    { if page_count > 1 {
                        html! {
                            <div class="flex items-center justify-between p-4 border-t border-border">
                                <button onclick={on_prev_page} disabled={current_page == 0} class="bg-[#B2CBDE] text-[#173E63] px-4 py-2 rounded-[10px] text-[10px] font-bold disabled:opacity-50">{"Previous"}</button>
                                <span class="text-xs text-muted-foreground">{ format!("Page {} of {}", current_page + 1, page_count) }</span>
                                <button onclick={on_next_page} disabled={current_page + 1 >= page_count} class="bg-[#B2CBDE] text-[#173E63] px-4 py-2 rounded-[10px] text-[10px] font-bold disabled:opacity-50">{"Next"}</button>
                            </div>
                        }
                    } else { html!{} } }
                </div>
            </>
        },
    )
}
