use wasm_bindgen_futures::spawn_local;
use web_sys::InputEvent;
use yew::prelude::*;

use crate::charts::{fortnight_series, monthly_breakdown, BarChart, LineChart, PieChart};
use crate::model::{self, Entry, EntryFilter};
use crate::{api, cache, export, icon_download, page_shell, Notice, StatCard, StatIcon};

#[function_component(StatisticsPage)]
pub fn statistics_page() -> Html {
    let entries = use_state(Vec::<Entry>::new);
    let categories = use_state(Vec::<String>::new);
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let notice = use_state(|| None::<(String, bool)>);

    let filter_from = use_state(|| "".to_string());
    let filter_to = use_state(|| "".to_string());
    let filter_category = use_state(|| "".to_string());

    {
        let entries = entries.clone();
        let categories = categories.clone();
        let loading = loading.clone();
        let load_error = load_error.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match cache::load::<Vec<Entry>>(cache::ENTRIES_KEY, cache::DEFAULT_TTL_MS) {
                        Some(mut cached) => {
                            model::sort_ascending(&mut cached);
                            entries.set(cached);
                        }
                        None => match api::fetch_entries().await {
                            Ok(mut fetched) => {
                                model::sort_ascending(&mut fetched);
                                cache::store(cache::ENTRIES_KEY, &fetched);
                                entries.set(fetched);
                            }
                            Err(err) => {
                                log::error!("failed to load entries: {err}");
                                load_error.set(Some("Could not load the records.".to_string()));
                            }
                        },
                    }

                    match cache::load::<Vec<String>>(cache::CATEGORIES_KEY, cache::DEFAULT_TTL_MS) {
                        Some(cached) => categories.set(cached),
                        None => match api::fetch_categories().await {
                            Ok(fetched) => {
                                cache::store(cache::CATEGORIES_KEY, &fetched);
                                categories.set(fetched);
                            }
                            Err(err) => {
                                log::warn!("failed to load categories: {err}");
                            }
                        },
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
            "Statistics",
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
            "Statistics",
            html! {},
            html! { <Notice message={message.clone()} is_error={true} /> },
        );
    }

    let filter = EntryFilter {
        from: (*filter_from).clone(),
        to: (*filter_to).clone(),
        category: (*filter_category).clone(),
        search: String::new(),
    };
    let filtered = filter.apply(&entries);

    let totals = model::totals(&filtered);
    let initial = model::initial_balance(&entries);
    let balance = initial + totals.income - totals.expense;

    let months = monthly_breakdown(&filtered);
    let series = fortnight_series(&filtered);

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

    page_shell(
        "Statistics",
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

                <div class="bg-card rounded-[10px] p-4 border border-border">
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                        <div class="space-y-1">
                            <label class="text-[12px] font-bold text-muted-foreground">{"From"}</label>
                            <input type="date" value={(*filter_from).clone()} oninput={{
                                let filter_from = filter_from.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                    filter_from.set(input.value());
                                })
                            }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                        </div>
                        <div class="space-y-1">
                            <label class="text-[12px] font-bold text-muted-foreground">{"To"}</label>
                            <input type="date" value={(*filter_to).clone()} oninput={{
                                let filter_to = filter_to.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                    filter_to.set(input.value());
                                })
                            }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                        </div>
                        <div class="space-y-1">
                            <label class="text-[12px] font-bold text-muted-foreground">{"Category"}</label>
                            <select onchange={{
                                let filter_category = filter_category.clone();
                                Callback::from(move |e: Event| {
                                    let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
                                    filter_category.set(input.value());
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

                <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
                    <StatCard title="Entries" value={totals.count.to_string()} icon={StatIcon::Receipt} />
                    <StatCard title="Total Income" value={model::format_amount(totals.income)} icon={StatIcon::TrendingUp} />
                    <StatCard title="Total Expense" value={model::format_amount(totals.expense)} icon={StatIcon::TrendingDown} />
                    <StatCard title="Current Balance" value={model::format_amount(balance)} icon={StatIcon::Wallet} danger={balance < 0.0} />
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 items-stretch">
                    <div class="bg-card rounded-[10px] p-6 border border-border">
                        <h3 class="font-bold text-foreground text-lg mb-4">{"Monthly Breakdown"}</h3>
                        <BarChart data={months} />
                    </div>
                    <div class="bg-card rounded-[10px] p-6 border border-border">
                        <h3 class="font-bold text-foreground text-lg mb-4">{"Income vs Expense"}</h3>
                        <PieChart income={totals.income} expense={totals.expense} />
                    </div>
                </div>

                <div class="bg-card rounded-[10px] p-6 border border-border">
                    <div class="flex items-center justify-between mb-4">
                        <h3 class="font-bold text-foreground text-lg">{"Net Balance Over Time"}</h3>
                        <span class="text-xs text-muted-foreground">{"Per fortnight"}</span>
                    </div>
                    <LineChart points={series} />
                </div>
            </>
        },
    )
}
