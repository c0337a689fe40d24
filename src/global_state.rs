use crate::application::{DashboardView, FetchState};
use crate::domain::chart::ChartPreview;
use leptos::*;
use once_cell::sync::OnceCell;

pub struct Globals {
    pub view: RwSignal<Option<DashboardView>>,
    pub fetch_state: RwSignal<FetchState>,
    pub notice: RwSignal<Option<String>>,
    pub chart: RwSignal<Option<ChartPreview>>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        view: create_rw_signal(None),
        fetch_state: create_rw_signal(FetchState::Idle),
        notice: create_rw_signal(None),
        chart: create_rw_signal(None),
    })
}

crate::global_signals! {
    pub dashboard_view => view: Option<DashboardView>,
    pub fetch_state => fetch_state: FetchState,
    pub notice => notice: Option<String>,
    pub chart_preview => chart: Option<ChartPreview>,
}
