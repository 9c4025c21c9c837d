//! A user's filter session.
//!
//! Holds the current selection, location and unit panel, reruns the
//! pipeline when they change and publishes the latest state on a
//! `tokio::sync::watch` channel. Selection changes are debounced; location
//! changes rerun at once with the last settled selection. Every run takes a
//! [`Token`] and only the newest run's result is published. After a run the
//! map is centered on the first listed unit unless a unit is open.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{Coordinates, FilterSelection, UnitId, UnitPanel};
use crate::geocoding::Geocoder;
use crate::units::UnitSource;

use super::debounce::Debouncer;
use super::runner::{FilterPipeline, PipelineOutput};
use super::sequencer::{Sequencer, Token};

/// Everything a session publishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// The settled selection. A change only lands here once the debounce
    /// window has passed.
    pub selection: FilterSelection,
    pub location: Option<Coordinates>,
    pub output: PipelineOutput,
    pub panel: UnitPanel,
    /// Map focus: the unit in the detail view, or else the first listed
    /// unit.
    pub focus: Option<Coordinates>,
}

struct Inner<S, G> {
    pipeline: Arc<FilterPipeline<S, G>>,
    sequencer: Sequencer,
    state: watch::Sender<SessionState>,
}

impl<S: UnitSource, G: Geocoder> Inner<S, G> {
    async fn refresh(&self) {
        let token = self.sequencer.issue();
        let (selection, location) = {
            let state = self.state.borrow();
            (state.selection, state.location)
        };

        let output = self.pipeline.run(&selection, location).await;

        if !self.sequencer.is_latest(token) {
            debug!(?token, "discarding stale pipeline result");
            return;
        }
        let first = output.summaries.first().map(|u| u.id);
        self.state.send_modify(|state| state.output = output);

        if let Some(id) = first {
            self.center_on_first(token, id).await;
        }
    }

    async fn center_on_first(&self, token: Token, id: UnitId) {
        if self.state.borrow().panel.selected_unit().is_some() {
            return;
        }

        let Some(focus) = self.locate_detail(id).await else {
            return;
        };
        if !self.sequencer.is_latest(token) {
            return;
        }

        self.state.send_modify(|state| {
            if state.panel.selected_unit().is_none() {
                state.focus = Some(focus);
            }
        });
    }

    /// Fetch a unit's detail and geocode it.
    async fn locate_detail(&self, id: UnitId) -> Option<Coordinates> {
        match self.pipeline.unit_detail(id).await {
            Ok(unit) => self.pipeline.locate_unit(&unit).await,
            Err(e) => {
                warn!(unit = id, error = %e, "could not load unit detail");
                None
            }
        }
    }
}

/// A filter session over a shared pipeline.
pub struct FilterSession<S, G> {
    inner: Arc<Inner<S, G>>,
    debouncer: Debouncer,
}

impl<S, G> FilterSession<S, G>
where
    S: UnitSource + 'static,
    G: Geocoder + 'static,
{
    pub fn new(pipeline: Arc<FilterPipeline<S, G>>) -> Self {
        let debouncer = Debouncer::new(pipeline.config().debounce());
        let (state, _) = watch::channel(SessionState::default());

        Self {
            inner: Arc::new(Inner {
                pipeline,
                sequencer: Sequencer::new(),
                state,
            }),
            debouncer,
        }
    }

    /// Watch the published state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Run the pipeline now with the settled selection and the current
    /// location, and wait for it.
    pub async fn refresh(&self) {
        self.inner.refresh().await;
    }

    /// Replace the selection. The pipeline reruns once no further change
    /// has arrived for the debounce window.
    pub fn update_selection(&self, selection: FilterSelection) {
        let inner = self.inner.clone();
        self.debouncer.schedule(async move {
            inner.state.send_modify(|state| state.selection = selection);
            inner.refresh().await
        });
    }

    /// Replace the user's location and rerun immediately. A selection
    /// still inside its debounce window is not used.
    pub fn update_location(&self, location: Option<Coordinates>) {
        self.inner
            .state
            .send_modify(|state| state.location = location);

        let inner = self.inner.clone();
        tokio::spawn(async move { inner.refresh().await });
    }

    /// Show a unit's details and focus the map on it.
    ///
    /// The focus stays unset if the unit cannot be fetched or its postal
    /// code does not resolve.
    pub async fn select_unit(&self, id: UnitId) {
        self.inner.state.send_modify(|state| {
            state.panel = state.panel.select(id);
            state.focus = None;
        });

        let focus = self.inner.locate_detail(id).await;

        self.inner.state.send_modify(|state| {
            if state.panel.selected_unit() == Some(id) {
                state.focus = focus;
            }
        });
    }

    /// Close the detail view, or show/hide the list. Closing the detail
    /// view clears the focus.
    pub fn toggle_panel(&self) {
        self.inner.state.send_modify(|state| {
            if state.panel.selected_unit().is_some() {
                state.focus = None;
            }
            state.panel = state.panel.toggle();
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{Value, json};

    use super::*;
    use crate::domain::RemoteFilter;
    use crate::geocoding::{GeocodeCache, GeocodeCacheConfig, GeocodingService, StubGeocoder};
    use crate::pipeline::PipelineConfig;
    use crate::units::StaticUnitSource;

    fn unit(id: i64, cep: &str) -> Value {
        json!({ "id": id, "nome": format!("Unidade {id}"), "local": { "endereco": [{ "cep": cep }] } })
    }

    fn session(
        source: StaticUnitSource,
        geocoder: StubGeocoder,
    ) -> FilterSession<StaticUnitSource, StubGeocoder> {
        let geocoding = GeocodingService::new(
            geocoder,
            GeocodeCache::new(&GeocodeCacheConfig::default()),
        );
        let pipeline = FilterPipeline::new(
            Arc::new(source),
            Arc::new(geocoding),
            PipelineConfig::default(),
        );
        FilterSession::new(Arc::new(pipeline))
    }

    fn source(s: &FilterSession<StaticUnitSource, StubGeocoder>) -> &StaticUnitSource {
        s.inner.pipeline.source()
    }

    fn ids(state: &SessionState) -> Vec<i64> {
        state.output.summaries.iter().map(|u| u.id).collect()
    }

    fn with_specialty(id: i64) -> FilterSelection {
        FilterSelection {
            specialty: Some(id),
            ..FilterSelection::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_selection_changes_run_once() {
        let s = session(
            StaticUnitSource::new().with_filtered(json!([unit(1, "1")])),
            StubGeocoder::new(),
        );

        s.update_selection(with_specialty(1));
        tokio::time::sleep(Duration::from_millis(100)).await;
        s.update_selection(with_specialty(2));
        tokio::time::sleep(Duration::from_millis(100)).await;
        s.update_selection(with_specialty(3));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(source(&s).filters().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            source(&s).filters(),
            vec![RemoteFilter {
                especialidade: Some(3),
                categoria: None
            }]
        );
        assert_eq!(ids(&s.state()), vec![1]);
        assert_eq!(s.state().selection, with_specialty(3));
    }

    #[tokio::test(start_paused = true)]
    async fn location_change_runs_immediately() {
        let s = session(
            StaticUnitSource::new().with_all(json!([unit(1, "1")])),
            StubGeocoder::new(),
        );
        let mut rx = s.subscribe();

        s.update_location(Some(Coordinates::new(-23.5, -46.9)));
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(source(&s).list_calls(), 1);
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.location, Some(Coordinates::new(-23.5, -46.9)));
        assert_eq!(ids(&state), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_result_is_discarded() {
        // Remote filtering is slow; listing everything is fast.
        let s = session(
            StaticUnitSource::new()
                .with_filtered(json!([unit(1, "1")]))
                .with_all(json!([unit(2, "2")]))
                .with_filter_delay(Duration::from_secs(1)),
            StubGeocoder::new(),
        );

        s.update_selection(with_specialty(5));
        tokio::time::sleep(Duration::from_millis(400)).await;
        // The slow run is in flight; a newer selection overtakes it.
        s.update_selection(FilterSelection::default());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(ids(&s.state()), vec![2]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(source(&s).filters().len(), 1);
        assert_eq!(ids(&s.state()), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn location_change_uses_settled_selection() {
        let s = session(
            StaticUnitSource::new()
                .with_filtered(json!([unit(1, "1")]))
                .with_all(json!([unit(2, "2")])),
            StubGeocoder::new(),
        );

        s.update_selection(with_specialty(1));
        tokio::time::sleep(Duration::from_millis(100)).await;
        s.update_location(Some(Coordinates::new(-23.5, -46.9)));
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The location run used the selection in force before the change.
        assert_eq!(source(&s).list_calls(), 1);
        assert_eq!(ids(&s.state()), vec![2]);
        assert_eq!(s.state().selection, FilterSelection::default());

        s.update_selection(with_specialty(2));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(
            source(&s).filters(),
            vec![RemoteFilter {
                especialidade: Some(2),
                categoria: None
            }]
        );
        assert_eq!(s.state().selection, with_specialty(2));
        assert_eq!(ids(&s.state()), vec![1]);
    }

    #[tokio::test]
    async fn run_centers_on_first_unit() {
        let s = session(
            StaticUnitSource::new()
                .with_all(json!([unit(1, "06622-000"), unit(2, "06600-025")]))
                .with_detail(1, json!({ "unidadeDeSaude": unit(1, "06622-000") })),
            StubGeocoder::new()
                .with("06622000", -23.52, -46.89)
                .with("06600025", -23.70, -46.89),
        );

        s.refresh().await;

        assert_eq!(s.state().focus, Some(Coordinates::new(-23.52, -46.89)));
    }

    #[tokio::test]
    async fn open_unit_keeps_focus_after_run() {
        let s = session(
            StaticUnitSource::new()
                .with_all(json!([unit(1, "06622-000")]))
                .with_detail(1, json!({ "unidadeDeSaude": unit(1, "06622-000") }))
                .with_detail(9, json!({ "unidadeDeSaude": unit(9, "06600-025") })),
            StubGeocoder::new()
                .with("06622000", -23.52, -46.89)
                .with("06600025", -23.70, -46.89),
        );

        s.select_unit(9).await;
        s.refresh().await;

        let state = s.state();
        assert_eq!(state.panel, UnitPanel::DetailView(9));
        assert_eq!(state.focus, Some(Coordinates::new(-23.70, -46.89)));
    }

    #[tokio::test]
    async fn empty_run_leaves_focus_unset() {
        let s = session(
            StaticUnitSource::new().with_all(json!({ "unidades": [] })),
            StubGeocoder::new(),
        );

        s.refresh().await;

        assert_eq!(s.state().focus, None);
    }

    #[tokio::test]
    async fn refresh_runs_inline() {
        let s = session(
            StaticUnitSource::new().with_all(json!({ "unidades": [unit(4, "1"), unit(3, "1")] })),
            StubGeocoder::new(),
        );

        s.refresh().await;

        assert_eq!(ids(&s.state()), vec![4, 3]);
    }

    #[tokio::test]
    async fn select_unit_sets_focus() {
        let s = session(
            StaticUnitSource::new()
                .with_detail(9, json!({ "unidadeDeSaude": unit(9, "06622-000") })),
            StubGeocoder::new().with("06622000", -23.52, -46.89),
        );

        s.select_unit(9).await;

        let state = s.state();
        assert_eq!(state.panel, UnitPanel::DetailView(9));
        assert_eq!(state.focus, Some(Coordinates::new(-23.52, -46.89)));
    }

    #[tokio::test]
    async fn unknown_unit_leaves_focus_unset() {
        let s = session(StaticUnitSource::new(), StubGeocoder::new());

        s.select_unit(404).await;

        let state = s.state();
        assert_eq!(state.panel, UnitPanel::DetailView(404));
        assert_eq!(state.focus, None);
    }

    #[tokio::test]
    async fn hiding_list_keeps_first_unit_focus() {
        let s = session(
            StaticUnitSource::new()
                .with_all(json!([unit(1, "06622-000")]))
                .with_detail(1, json!({ "unidadeDeSaude": unit(1, "06622-000") })),
            StubGeocoder::new().with("06622000", -23.52, -46.89),
        );
        s.refresh().await;

        s.toggle_panel();

        assert_eq!(s.state().panel, UnitPanel::Hidden);
        assert_eq!(s.state().focus, Some(Coordinates::new(-23.52, -46.89)));
    }

    #[tokio::test]
    async fn toggle_panel_cycle() {
        let s = session(
            StaticUnitSource::new()
                .with_detail(9, json!({ "unidadeDeSaude": unit(9, "06622-000") })),
            StubGeocoder::new().with("06622000", -23.52, -46.89),
        );
        s.select_unit(9).await;

        s.toggle_panel();
        assert_eq!(s.state().panel, UnitPanel::ListView);
        assert_eq!(s.state().focus, None);

        s.toggle_panel();
        assert_eq!(s.state().panel, UnitPanel::Hidden);
        assert_eq!(s.state().focus, None);

        s.toggle_panel();
        assert_eq!(s.state().panel, UnitPanel::ListView);
    }
}
