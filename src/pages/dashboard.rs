use wasm_bindgen_futures::spawn_local;
use web_sys::InputEvent;
use yew::prelude::*;

use crate::charts::{fortnight_series, LineChart};
use crate::model::{self, Entry, NewEntry};
use crate::{api, cache, icon_trash, page_shell, Notice, StatCard, StatIcon};

const ITEMS_PER_PAGE: usize = 8;

const QUOTES: &[(&str, &str)] = &[
    (
        "Wealth consists not in having great possessions, but in having few wants.",
        "Epictetus",
    ),
    (
        "It is not the man who has too little, but the man who craves more, that is poor.",
        "Seneca",
    ),
    (
        "You have power over your mind, not outside events. Realize this, and you will find strength.",
        "Marcus Aurelius",
    ),
    (
        "He is a wise man who does not grieve for the things which he has not, but rejoices for those which he has.",
        "Epictetus",
    ),
    (
        "We suffer more often in imagination than in reality.",
        "Seneca",
    ),
];

fn random_quote() -> (&'static str, &'static str) {
    let idx = (js_sys::Math::random() * QUOTES.len() as f64) as usize;
    QUOTES[idx.min(QUOTES.len() - 1)]
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let entries = use_state(Vec::<Entry>::new);
    let categories = use_state(Vec::<String>::new);
    let loading = use_state(|| true);
    let load_error = use_state(|| None::<String>);
    let notice = use_state(|| None::<(String, bool)>);
    let quote = use_state(|| None::<(&'static str, &'static str)>);
    let list_page = use_state(|| 0usize);

    let filter_date = use_state(|| "".to_string());

    let form_date = use_state(|| "".to_string());
    let form_amount = use_state(|| "".to_string());
    let form_category = use_state(|| "".to_string());
    let form_description = use_state(|| "".to_string());
    let form_income = use_state(|| false);
    let form_expense = use_state(|| false);
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    {
        let entries = entries.clone();
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
                    loading.set(false);
                });
                || ()
            },
            (),
        );
    }

    {
        let categories = categories.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
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
                });
                || ()
            },
            (),
        );
    }

    let on_submit = {
        let entries = entries.clone();
        let form_date = form_date.clone();
        let form_amount = form_amount.clone();
        let form_category = form_category.clone();
        let form_description = form_description.clone();
        let form_income = form_income.clone();
        let form_expense = form_expense.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        let notice = notice.clone();
        let quote = quote.clone();
        Callback::from(move |_| {
            let date_val = form_date.trim().to_string();
            let amount_val = form_amount.trim().to_string();
            let category_val = form_category.trim().to_string();
            let description_val = form_description.trim().to_string();
            let income_val = *form_income;
            let expense_val = *form_expense;

            if date_val.is_empty()
                || amount_val.is_empty()
                || category_val.is_empty()
                || description_val.is_empty()
            {
                form_error.set(Some("Please complete all fields.".to_string()));
                return;
            }

            let amount = amount_val.parse::<f64>().unwrap_or(0.0);
            if amount <= 0.0 {
                form_error.set(Some("Amount must be a positive number.".to_string()));
                return;
            }

            if income_val && expense_val {
                form_error.set(Some(
                    "An entry cannot be both income and expense.".to_string(),
                ));
                return;
            }

            if !income_val && !expense_val {
                form_error.set(Some("Select income or expense.".to_string()));
                return;
            }

            form_error.set(None);
            saving.set(true);

            let entries = entries.clone();
            let form_date = form_date.clone();
            let form_amount = form_amount.clone();
            let form_category = form_category.clone();
            let form_description = form_description.clone();
            let form_income = form_income.clone();
            let form_expense = form_expense.clone();
            let saving = saving.clone();
            let notice = notice.clone();
            let quote = quote.clone();
            spawn_local(async move {
                let new_entry = NewEntry {
                    date: date_val,
                    amount,
                    category: category_val,
                    description: description_val,
                    income: income_val,
                    expense: expense_val,
                };

                match api::create_entry(&new_entry).await {
                    Ok(created) => {
                        let mut next = (*entries).clone();
                        next.extend(created);
                        model::sort_ascending(&mut next);
                        cache::store(cache::ENTRIES_KEY, &next);
                        entries.set(next);

                        form_date.set("".to_string());
                        form_amount.set("".to_string());
                        form_category.set("".to_string());
                        form_description.set("".to_string());
                        form_income.set(false);
                        form_expense.set(false);

                        notice.set(Some(("Entry added.".to_string(), false)));
                        quote.set(Some(random_quote()));
                    }
                    Err(err) => {
                        log::error!("failed to add entry: {err}");
                        notice.set(Some(("Could not save the entry.".to_string(), true)));
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_delete = {
        let entries = entries.clone();
        let notice = notice.clone();
        Callback::from(move |id: String| {
            let entries = entries.clone();
            let notice = notice.clone();
            let previous = (*entries).clone();
            let next: Vec<Entry> = previous
                .iter()
                .filter(|entry| entry.id != id)
                .cloned()
                .collect();
            entries.set(next.clone());
            spawn_local(async move {
                match api::delete_entry(&id).await {
                    Ok(()) => {
                        cache::store(cache::ENTRIES_KEY, &next);
                        notice.set(Some(("Entry deleted.".to_string(), false)));
                    }
                    Err(err) => {
                        log::error!("failed to delete entry {id}: {err}");
                        entries.set(previous);
                        notice.set(Some((
                            "Could not delete the entry. It was restored.".to_string(),
                            true,
                        )));
                    }
                }
            });
        })
    };

    let close_quote = {
        let quote = quote.clone();
        Callback::from(move |_| quote.set(None))
    };

    if *loading {
        return page_shell(
            "Dashboard",
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
            "Dashboard",
            html! {},
            html! { <Notice message={message.clone()} is_error={true} /> },
        );
    }

    // "Up to" cutoff applied to totals, chart, and listing alike.
    let visible: Vec<Entry> = match model::parse_date(&filter_date) {
        Some(limit) => entries
            .iter()
            .filter(|entry| model::parse_date(&entry.date).map_or(false, |d| d <= limit))
            .cloned()
            .collect(),
        None => (*entries).clone(),
    };

    let totals = model::totals(&visible);
    let initial = model::initial_balance(&entries);
    let balance = initial + totals.income - totals.expense;
    let series = fortnight_series(&visible);

    let mut listed = visible.clone();
    model::sort_recent_first(&mut listed);
    let page_count = (listed.len() + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE;
    let current_page = (*list_page).min(page_count.saturating_sub(1));
    let page_rows: Vec<Entry> = listed
        .iter()
        .skip(current_page * ITEMS_PER_PAGE)
        .take(ITEMS_PER_PAGE)
        .cloned()
        .collect();

    let on_prev_page = {
        let list_page = list_page.clone();
        Callback::from(move |_| list_page.set(current_page.saturating_sub(1)))
    };
    let on_next_page = {
        let list_page = list_page.clone();
        Callback::from(move |_| {
            if current_page + 1 < page_count {
                list_page.set(current_page + 1);
            }
        })
    };

    page_shell(
        "Dashboard",
        html! {},
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

                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 items-stretch">
                    <div class="bg-card rounded-[10px] p-6 border border-border">
                        <div class="flex items-center justify-between mb-3">
                            <h3 class="font-bold text-foreground text-lg">{"Overview"}</h3>
                            <span class="text-xs text-muted-foreground">{"Net balance per fortnight"}</span>
                        </div>
                        <div class="space-y-1 mb-4">
                            <label class="text-[12px] font-bold text-muted-foreground">{"Up to date"}</label>
                            <input type="date" value={(*filter_date).clone()} oninput={{
                                let filter_date = filter_date.clone();
                                let list_page = list_page.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                    filter_date.set(input.value());
                                    list_page.set(0);
                                })
                            }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                        </div>
                        <LineChart points={series} />
                    </div>

                    <div class="bg-card rounded-[10px] p-6 border border-border">
                        <h4 class="text-[#1D617A] font-bold text-[15px] mb-3 tracking-wider">{"Add New Entry"}</h4>
                        <div class="grid grid-cols-2 gap-3 mb-3">
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-muted-foreground">{"Date"}</label>
                                <input type="date" value={(*form_date).clone()} oninput={{
                                    let form_date = form_date.clone();
                                    Callback::from(move |e: InputEvent| {
                                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                        form_date.set(input.value());
                                    })
                                }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                            </div>
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-muted-foreground">{"Amount ($)"}</label>
                                <input type="number" placeholder="0.00" value={(*form_amount).clone()} oninput={{
                                    let form_amount = form_amount.clone();
                                    Callback::from(move |e: InputEvent| {
                                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                        form_amount.set(input.value());
                                    })
                                }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                            </div>
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-muted-foreground">{"Category"}</label>
                                { if categories.is_empty() {
                                    html! {
                                        <input type="text" placeholder="Category" value={(*form_category).clone()} oninput={{
                                            let form_category = form_category.clone();
                                            Callback::from(move |e: InputEvent| {
                                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                                form_category.set(input.value());
                                            })
                                        }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                                    }
                                } else {
                                    html! {
                                        <select value={(*form_category).clone()} onchange={{
                                            let form_category = form_category.clone();
                                            Callback::from(move |e: Event| {
                                                let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
                                                form_category.set(input.value());
                                            })
                                        }} class="w-full bg-[#f1f4f9] border-2 border-transparent rounded-[10px] px-3 py-2 text-[11px] focus:ring-2 focus:ring-[#1D617A] outline-none">
                                            <option value="" selected={form_category.is_empty()}>{"Select category"}</option>
                                            { for categories.iter().map(|category| html! {
                                                <option value={category.clone()} selected={*form_category == *category}>{ category.clone() }</option>
                                            }) }
                                        </select>
                                    }
                                }}
                            </div>
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-muted-foreground">{"Description"}</label>
                                <input type="text" placeholder="What was it for?" value={(*form_description).clone()} oninput={{
                                    let form_description = form_description.clone();
                                    Callback::from(move |e: InputEvent| {
                                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                        form_description.set(input.value());
                                    })
                                }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                            </div>
                        </div>
                        <div class="flex items-center gap-6 mb-4">
                            <label class="flex items-center gap-2 text-sm text-foreground">
                                <input type="checkbox" checked={*form_income} onclick={{
                                    let form_income = form_income.clone();
                                    Callback::from(move |_| form_income.set(!*form_income))
                                }} />
                                {"Income"}
                            </label>
                            <label class="flex items-center gap-2 text-sm text-foreground">
                                <input type="checkbox" checked={*form_expense} onclick={{
                                    let form_expense = form_expense.clone();
                                    Callback::from(move |_| form_expense.set(!*form_expense))
                                }} />
                                {"Expense"}
                            </label>
                        </div>
                        <button onclick={on_submit} class="w-full bg-[#173E63] text-white py-2 rounded-[10px] text-[10px] font-bold flex items-center justify-center gap-2" disabled={*saving || (*form_income && *form_expense)}>
                            { if *saving { "Saving..." } else { "Add Entry" } }
                        </button>
                        {
                            if let Some(msg) = &*form_error {
                                html! { <p class="text-sm text-red-500 mt-3">{ msg.clone() }</p> }
                            } else { html!{} }
                        }
                    </div>
                </div>

                <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
                    <div class="p-6 flex justify-between items-center border-b border-border">
                        <h3 class="font-bold text-foreground text-lg">{"Recent Entries"}</h3>
                    </div>
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-8 py-4 font-bold">{"Date"}</th>
                                    <th class="px-8 py-4 font-bold">{"Description"}</th>
                                    <th class="px-8 py-4 font-bold">{"Category"}</th>
                                    <th class="px-8 py-4 font-bold">{"Type"}</th>
                                    <th class="px-8 py-4 font-bold text-right">{"Amount"}</th>
                                    <th class="px-8 py-4 font-bold"></th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                { if page_rows.is_empty() {
                                    html! { <tr><td colspan="6" class="px-8 py-6 text-center text-muted-foreground">{"No entries yet."}</td></tr> }
                                } else {
                                    html! {
                                        <>
                                            { for page_rows.iter().map(|entry| {
                                                let id = entry.id.clone();
                                                let on_delete = on_delete.clone();
                                                let type_badge = if entry.income {
                                                    html! { <span class="bg-green-100 text-green-700 px-3 py-1 rounded-full text-[10px] font-bold">{"Income"}</span> }
                                                } else if entry.expense {
                                                    html! { <span class="bg-red-100 text-red-700 px-3 py-1 rounded-full text-[10px] font-bold">{"Expense"}</span> }
                                                } else {
                                                    html! { <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">{"—"}</span> }
                                                };
                                                let amount_label = if entry.income {
                                                    format!("+ {}", model::format_amount(entry.amount))
                                                } else if entry.expense {
                                                    format!("- {}", model::format_amount(entry.amount))
                                                } else {
                                                    model::format_amount(entry.amount)
                                                };
                                                html! {
                                                    <tr key={entry.id.clone()} class="text-sm hover:bg-muted/30 transition-colors">
                                                        <td class="px-8 py-4 text-muted-foreground">{ if entry.date.is_empty() { "—" } else { entry.date.as_str() } }</td>
                                                        <td class="px-8 py-4 text-foreground">{ &entry.description }</td>
                                                        <td class="px-8 py-4">
                                                            <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">{ &entry.category }</span>
                                                        </td>
                                                        <td class="px-8 py-4">{ type_badge }</td>
                                                        <td class="px-8 py-4 text-right font-semibold text-foreground">{ amount_label }</td>
                                                        <td class="px-8 py-4 text-right">
                                                            <button class="p-2 hover:bg-red-50 rounded-full transition-colors" aria-label="Delete entry" onclick={Callback::from(move |_| on_delete.emit(id.clone()))}>
                                                                { icon_trash() }
                                                            </button>
                                                        </td>
                                                    </tr>
                                                }
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

                { if let Some((text, author)) = *quote {
                    html! {
                        <div class="fixed inset-0 bg-black/40 flex items-center justify-center z-50">
                            <div class="bg-white rounded-2xl shadow-lg p-6 max-w-sm text-center">
                                <p class="text-sm italic text-[#173E63]">{ text }</p>
                                <p class="mt-2 text-[10px] font-bold text-slate-400 uppercase tracking-widest">{ author }</p>
                                <button onclick={close_quote} class="mt-4 bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-[10px] font-bold">{"Close"}</button>
                            </div>
                        </div>
                    }
                } else { html!{} } }
            </>
        },
    )
}
