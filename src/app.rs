use leptos::html::Canvas;
use leptos::*;
use strum::IntoEnumIterator;

use crate::{
    application::{DashboardView, FetchState},
    domain::{
        events::Intent,
        logging::LogComponent,
        market_data::Asset,
        preferences::{DisplayPreferences, DisplayToggle, SortMode},
        selection::MAX_COMPARISON,
    },
    event_utils::on_escape,
    global_state::{chart_preview, dashboard_view, fetch_state, notice},
    log_warn,
    presentation::{
        chart_canvas::draw_preview,
        format::{format_billions, format_change, format_percent, format_price, format_trillions},
    },
    time_utils::format_last_update,
    view_state::ViewRow,
};

fn read_view<T>(f: impl FnOnce(&DashboardView) -> T) -> Option<T> {
    dashboard_view().with(|view| view.as_ref().map(f))
}

fn preferences() -> DisplayPreferences {
    read_view(|view| view.preferences).unwrap_or_default()
}

/// Status line under the header
fn fetch_status(state: &FetchState) -> Option<String> {
    match state {
        FetchState::Fetching { attempt: 1 } => Some("Loading cryptocurrency data...".to_string()),
        FetchState::Fetching { attempt } => Some(format!("Loading cryptocurrency data (attempt {attempt})...")),
        FetchState::RetryWaiting { retry } => Some(format!("Request failed, retry {retry} scheduled...")),
        _ => None,
    }
}

/// 🪙 Crypto market dashboard root
#[component]
pub fn App(on_intent: Callback<Intent>) -> impl IntoView {
    let escape = on_escape(move || chart_preview().set(None));
    on_cleanup(move || drop(escape));

    view! {
        <style>{STYLES}</style>
        <div class="dashboard" data-theme=move || preferences().theme.to_string()>
            <Header on_intent=on_intent />
            <StatsBar />
            <Controls on_intent=on_intent />
            <Notice />
            <div class="layout">
                <main>
                    <AssetList on_intent=on_intent />
                    <div class="last-updated">
                        {move || format_last_update(read_view(|view| view.last_update).flatten())}
                    </div>
                </main>
                <aside>
                    <ComparisonPanel on_intent=on_intent />
                    <FavoritesPanel on_intent=on_intent />
                </aside>
            </div>
            <ChartModal />
        </div>
    }
}

#[component]
fn Header(on_intent: Callback<Intent>) -> impl IntoView {
    let theme = move || preferences().theme;

    view! {
        <header class="header">
            <h1>"🪙 Crypto Market Dashboard"</h1>
            <div class="status">{move || fetch_state().with(fetch_status)}</div>
            <button
                class="theme-toggle"
                on:click=move |_| on_intent.call(Intent::SetTheme(theme().toggled()))
            >
                {move || format!("Theme: {}", theme())}
            </button>
        </header>
    }
}

#[component]
fn StatsBar() -> impl IntoView {
    let stats = move || read_view(|view| view.stats).unwrap_or_default();

    view! {
        <div class="stats-bar">
            <div class="stat">
                <div class="stat-value">{move || format_trillions(stats().total_market_cap)}</div>
                <div class="stat-label">"Total Market Cap"</div>
            </div>
            <div class="stat">
                <div class="stat-value">{move || format_billions(stats().total_volume)}</div>
                <div class="stat-label">"24h Volume"</div>
            </div>
            <div class="stat">
                <div class="stat-value">{move || format_percent(stats().btc_dominance)}</div>
                <div class="stat-label">"BTC Dominance"</div>
            </div>
        </div>
    }
}

#[component]
fn Controls(on_intent: Callback<Intent>) -> impl IntoView {
    let on_sort = move |ev: ev::Event| {
        on_intent.call(Intent::SetSort(SortMode::parse_lenient(&event_target_value(&ev))));
    };

    view! {
        <div class="controls">
            <label>
                "Sort by "
                <select on:change=on_sort>
                    {SortMode::CHOICES
                        .into_iter()
                        .map(|mode| {
                            view! {
                                <option value=mode.to_string() selected=move || preferences().sort_by == mode>
                                    {mode.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </label>
            {DisplayToggle::iter()
                .map(|which| {
                    let active = move || preferences().toggle(which);
                    view! {
                        <button
                            class="toggle-btn"
                            class:active=active
                            on:click=move |_| on_intent.call(Intent::SetToggle { which, value: !active() })
                        >
                            {which.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Dismissable banner for rejected intents and fetch failures
#[component]
fn Notice() -> impl IntoView {
    let fetch_error = move || read_view(|view| view.last_error.clone()).flatten();

    view! {
        <Show when=move || notice().with(Option::is_some)>
            <div class="notice">
                <span>{move || notice().get().unwrap_or_default()}</span>
                <button on:click=move |_| notice().set(None)>"✕"</button>
            </div>
        </Show>
        <Show when=move || fetch_error().is_some()>
            <div class="error">{move || fetch_error().unwrap_or_default()}</div>
        </Show>
    }
}

#[component]
fn AssetList(on_intent: Callback<Intent>) -> impl IntoView {
    view! {
        <div class="crypto-grid">
            {move || {
                let loading = fetch_state().with(FetchState::is_in_flight);
                dashboard_view()
                    .with(|view| match view {
                        Some(view) if view.has_data() => {
                            let prefs = view.preferences;
                            view.rows
                                .iter()
                                .cloned()
                                .map(|row| view! { <AssetCard row=row prefs=prefs on_intent=on_intent /> })
                                .collect_view()
                        }
                        Some(view) if view.last_error.is_some() => {
                            view! { <div class="error">"Unable to load cryptocurrency data"</div> }.into_view()
                        }
                        _ if loading => {
                            view! { <div class="loading">"Loading cryptocurrency data..."</div> }.into_view()
                        }
                        _ => view! { <div class="loading">"Waiting for first update..."</div> }.into_view(),
                    })
            }}
        </div>
    }
}

#[component]
fn AssetLogo(asset: Asset) -> impl IntoView {
    let alt = format!("{} logo", asset.name);
    view! { <img src=asset.image class="crypto-logo" alt=alt /> }
}

#[component]
fn AssetCard(row: ViewRow, prefs: DisplayPreferences, on_intent: Callback<Intent>) -> impl IntoView {
    let ViewRow { asset, is_selected, is_favorite, is_positive_change } = row;
    let change_class = if is_positive_change { "price-change positive" } else { "price-change negative" };
    let change = asset.price_change_24h.value();
    let compare_id = asset.id.clone();
    let favorite_id = asset.id.clone();
    let chart_id = asset.id.clone();

    view! {
        <div class="crypto-card" class:selected=is_selected class:favorite=is_favorite>
            <div class="crypto-header">
                <AssetLogo asset=asset.clone() />
                <h3>{asset.name.clone()} " " <span>"(" {asset.display_symbol()} ")"</span></h3>
            </div>
            <div class="price">{format_price(asset.current_price.value())}</div>
            {prefs.show_24h_change.then(|| view! { <div class=change_class>{format_change(change)}</div> })}
            {prefs
                .show_volume
                .then(|| view! { <div class="volume">"Volume: " {format_billions(asset.total_volume.value())}</div> })}
            <div class="market-cap">"Market Cap: " {format_billions(asset.market_cap.value())}</div>
            {prefs
                .show_charts
                .then(|| {
                    view! {
                        <button class="chart-btn" on:click=move |_| on_intent.call(Intent::ShowChart(chart_id.clone()))>
                            "📈 View Chart"
                        </button>
                    }
                })}
            <div class="card-actions">
                <button
                    class="toggle-comparison"
                    class:remove=is_selected
                    on:click=move |_| on_intent.call(Intent::ToggleComparison(compare_id.clone()))
                >
                    {if is_selected { "Remove" } else { "Add to Comparison" }}
                </button>
                <button
                    class="toggle-favorite"
                    on:click=move |_| on_intent.call(Intent::ToggleFavorite(favorite_id.clone()))
                >
                    {if is_favorite { "★" } else { "☆" }}
                </button>
            </div>
        </div>
    }
}

#[component]
fn ComparisonPanel(on_intent: Callback<Intent>) -> impl IntoView {
    let counts = move || read_view(|view| (view.selection_count, view.max_comparison)).unwrap_or((0, MAX_COMPARISON));
    let rows = move || read_view(|view| view.comparison.clone()).unwrap_or_default();

    view! {
        <section class="comparison">
            <div class="section-header">
                <h2>
                    {move || {
                        let (selected, max) = counts();
                        format!("Comparison ({selected}/{max})")
                    }}
                </h2>
                <button on:click=move |_| on_intent.call(Intent::ExportComparison) disabled=move || counts().0 == 0>
                    "Export CSV"
                </button>
                <button on:click=move |_| on_intent.call(Intent::ClearComparison)>"Clear"</button>
            </div>
            <div class="comparison-grid">
                {move || {
                    let rows = rows();
                    if rows.is_empty() {
                        let max = counts().1;
                        view! { <div class="empty">{format!("Select up to {max} cryptocurrencies to compare")}</div> }
                            .into_view()
                    } else {
                        rows.into_iter()
                            .map(|row| view! { <ComparisonCard row=row on_intent=on_intent /> })
                            .collect_view()
                    }
                }}
            </div>
        </section>
    }
}

#[component]
fn ComparisonCard(row: ViewRow, on_intent: Callback<Intent>) -> impl IntoView {
    let asset = row.asset;
    let id = asset.id.clone();
    let change_class = if row.is_positive_change { "price-change positive" } else { "price-change negative" };

    view! {
        <div class="comparison-card">
            <div class="crypto-header">
                <AssetLogo asset=asset.clone() />
                <h3>{asset.name.clone()} " " <span>"(" {asset.display_symbol()} ")"</span></h3>
            </div>
            <div class="price">{format_price(asset.current_price.value())}</div>
            <div class=change_class>{format_change(asset.price_change_24h.value())}</div>
            <div class="volume">"Volume: " {format_billions(asset.total_volume.value())}</div>
            <div class="market-cap">"Market Cap: " {format_billions(asset.market_cap.value())}</div>
            <button class="remove-comparison" on:click=move |_| on_intent.call(Intent::ToggleComparison(id.clone()))>
                "✕"
            </button>
        </div>
    }
}

#[component]
fn FavoritesPanel(on_intent: Callback<Intent>) -> impl IntoView {
    let favorites = move || read_view(|view| view.favorites.clone()).unwrap_or_default();

    view! {
        <section class="favorites">
            <h2>"⭐ Favorites"</h2>
            {move || {
                let favorites = favorites();
                if favorites.is_empty() {
                    view! { <div class="no-favorites">"No favorites added yet"</div> }.into_view()
                } else {
                    favorites
                        .into_iter()
                        .map(|asset| {
                            let id = asset.id.clone();
                            view! {
                                <div class="favorite-item">
                                    <AssetLogo asset=asset.clone() />
                                    <span>{asset.name.clone()}</span>
                                    <button
                                        class="remove-favorite"
                                        on:click=move |_| on_intent.call(Intent::ToggleFavorite(id.clone()))
                                    >
                                        "★"
                                    </button>
                                </div>
                            }
                        })
                        .collect_view()
                }
            }}
        </section>
    }
}

/// Illustrative price chart; closes on ✕, backdrop click or Escape
#[component]
fn ChartModal() -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();
    let is_open = move || chart_preview().with(Option::is_some);
    let title = move || chart_preview().with(|p| p.as_ref().map(|p| p.title.clone()).unwrap_or_default());

    create_effect(move |_| {
        let preview = chart_preview().get();
        if let (Some(preview), Some(canvas)) = (preview, canvas_ref.get()) {
            if let Err(e) = draw_preview(&canvas, &preview) {
                log_warn!(LogComponent::Presentation("ChartModal"), "⚠️ Chart draw failed: {:?}", e);
            }
        }
    });

    view! {
        <div
            class="modal"
            style:display=move || if is_open() { "block" } else { "none" }
            on:click=move |_| chart_preview().set(None)
        >
            <div class="modal-content" on:click=|ev: ev::MouseEvent| ev.stop_propagation()>
                <div class="section-header">
                    <h2>{title}</h2>
                    <button class="close" on:click=move |_| chart_preview().set(None)>"✕"</button>
                </div>
                <canvas node_ref=canvas_ref width="600" height="300" />
            </div>
        </div>
    }
}

const STYLES: &str = r#"
.dashboard {
    --bg: #0f1420;
    --card: #1a2233;
    --text: #e6ebf5;
    --muted: #8a94a6;
    --accent: #00ff9d;
    font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
    background: var(--bg);
    color: var(--text);
    min-height: 100vh;
    padding: 20px;
}
.dashboard[data-theme="light"] {
    --bg: #f4f6fb;
    --card: #ffffff;
    --text: #1a2233;
    --muted: #5b6477;
}
.header, .section-header { display: flex; align-items: center; justify-content: space-between; gap: 12px; }
.status { color: var(--muted); font-size: 14px; }
.stats-bar { display: flex; gap: 40px; justify-content: center; margin: 16px 0; }
.stat { text-align: center; }
.stat-value { font-size: 22px; font-weight: bold; color: var(--accent); }
.stat-label, .last-updated, .market-cap, .volume { color: var(--muted); font-size: 13px; }
.controls { display: flex; gap: 10px; align-items: center; margin-bottom: 16px; }
.toggle-btn.active { background: var(--accent); color: #000; }
.layout { display: grid; grid-template-columns: 3fr 1fr; gap: 20px; }
.crypto-grid, .comparison-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 12px; }
.crypto-card, .comparison-card, .favorite-item { background: var(--card); border-radius: 10px; padding: 12px; }
.crypto-card.selected { outline: 2px solid var(--accent); }
.crypto-logo { width: 24px; height: 24px; }
.crypto-header { display: flex; gap: 8px; align-items: center; }
.price { font-size: 20px; margin: 8px 0; }
.positive { color: #00c853; }
.negative { color: #ff5252; }
.card-actions { display: flex; justify-content: space-between; margin-top: 8px; }
.notice, .error { padding: 10px; margin-bottom: 12px; border-radius: 6px; background: #661a1a; color: #fff; }
.modal { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.6); }
.modal-content { background: var(--card); margin: 10vh auto; padding: 20px; width: 640px; border-radius: 12px; }
"#;
