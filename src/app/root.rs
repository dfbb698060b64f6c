use {
    crate::{
        Cli,
        app::state::{ComparisonView, RefreshStatus, SingleView, Tab},
        config::{DF, LevelSettings, PERSISTENCE},
        data::{
            CachedLoader, FileStamp, InstrumentCatalog, LoadedSeries, RefreshCoordinator,
            YahooProvider, find_series_file,
        },
        domain::{Frequency, Instrument},
        ui::{UI_CONFIG, UI_TEXT, describe_error},
    },
    eframe::{
        Frame, Storage,
        egui::{Context, Visuals},
    },
    poll_promise::Promise,
    serde::{Deserialize, Serialize},
    std::{
        collections::HashMap,
        mem,
        path::{Path, PathBuf},
        sync::Arc,
        time::Duration,
    },
    tokio::runtime::Runtime,
};

const REFRESH_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Storage, cache and network collaborators. Built once at startup.
pub(crate) struct DataSources {
    pub(crate) data_root: PathBuf,
    pub(crate) catalog_path: PathBuf,
    pub(crate) loader: CachedLoader,
    refresher: Option<(Arc<RefreshCoordinator>, Arc<Runtime>)>,
}

impl DataSources {
    pub(crate) fn new(args: &Cli) -> Self {
        let loader = CachedLoader::in_memory();
        let catalog_path = args
            .catalog
            .clone()
            .unwrap_or_else(|| args.data_dir.join(PERSISTENCE.data.catalog_file));

        let refresher = match (YahooProvider::new(), Runtime::new()) {
            (Ok(provider), Ok(runtime)) => Some((
                Arc::new(RefreshCoordinator::new(Arc::new(provider), loader.clone())),
                Arc::new(runtime),
            )),
            (Err(e), _) => {
                log::warn!("Refresh disabled, provider unavailable: {}", e);
                None
            }
            (_, Err(e)) => {
                log::warn!("Refresh disabled, no async runtime: {}", e);
                None
            }
        };

        Self {
            data_root: args.data_dir.clone(),
            catalog_path,
            loader,
            refresher,
        }
    }

    pub(crate) fn can_refresh(&self) -> bool {
        self.refresher.is_some()
    }
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct App {
    pub(crate) frequency: Frequency,
    pub(crate) tab: Tab,
    pub(crate) level_settings: LevelSettings, // persists across sessions.
    /// `None` shows every sector.
    pub(crate) sector: Option<String>,
    pub(crate) selected: Option<String>,
    pub(crate) compare_first: Option<String>,
    pub(crate) compare_second: Option<String>,
    #[serde(skip)]
    pub(crate) sources: Option<DataSources>,
    #[serde(skip)]
    pub(crate) catalog: InstrumentCatalog,
    #[serde(skip)]
    pub(crate) catalog_error: Option<String>,
    /// Last failed load per path, retried only once the file changes
    #[serde(skip)]
    failed_loads: HashMap<PathBuf, (FileStamp, String)>,
    #[serde(skip)]
    pub(crate) single: SingleView,
    #[serde(skip)]
    pub(crate) single_error: Option<String>,
    #[serde(skip)]
    pub(crate) comparison: ComparisonView,
    #[serde(skip)]
    pub(crate) comparison_error: Option<String>,
    #[serde(skip)]
    pub(crate) refresh: RefreshStatus,
}

impl Default for App {
    fn default() -> Self {
        Self {
            frequency: Frequency::default(),
            tab: Tab::default(),
            level_settings: LevelSettings::default(),
            sector: None,
            selected: None,
            compare_first: None,
            compare_second: None,
            sources: None,
            catalog: InstrumentCatalog::default(),
            catalog_error: None,
            failed_loads: HashMap::new(),
            single: SingleView::default(),
            single_error: None,
            comparison: ComparisonView::default(),
            comparison_error: None,
            refresh: RefreshStatus::default(),
        }
    }
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let mut app: App = if let Some(storage) = cc.storage {
            eframe::get_value(storage, PERSISTENCE.app.storage_key).unwrap_or_default()
        } else {
            Self::default()
        };

        app.sources = Some(DataSources::new(&args));
        app.reload_catalog();
        app
    }

    /// Re-reads the catalog for the current frequency and drops selections it
    /// no longer offers.
    pub(crate) fn reload_catalog(&mut self) {
        let Some(sources) = &self.sources else {
            return;
        };
        let discovered =
            InstrumentCatalog::discover(&sources.catalog_path, &sources.data_root, self.frequency);
        match discovered {
            Ok(catalog) => {
                self.catalog = catalog;
                self.catalog_error = None;
            }
            Err(e) => {
                log::error!("Failed to read instrument catalog: {:#}", e);
                self.catalog = InstrumentCatalog::default();
                self.catalog_error = Some(describe_error(&e));
            }
        }
        if DF.log_catalog {
            log::info!(
                "catalog: {} instruments for {}",
                self.catalog.identifiers(None).len(),
                self.frequency
            );
        }

        if self
            .sector
            .as_ref()
            .is_some_and(|s| !self.catalog.sectors().contains(s))
        {
            self.sector = None;
        }
        let offered = self.catalog.identifiers(None);
        for choice in [
            &mut self.selected,
            &mut self.compare_first,
            &mut self.compare_second,
        ] {
            if choice.as_ref().is_some_and(|id| !offered.contains(id)) {
                *choice = None;
            }
        }
    }

    pub(crate) fn set_frequency(&mut self, frequency: Frequency) {
        if self.frequency != frequency {
            self.frequency = frequency;
            self.reload_catalog();
        }
    }

    /// Identifiers offered under the current sector filter.
    pub(crate) fn instruments(&self) -> Vec<String> {
        self.catalog.identifiers(self.sector.as_deref())
    }

    pub(crate) fn series_path(&self, identifier: &str) -> Option<PathBuf> {
        let sources = self.sources.as_ref()?;
        find_series_file(
            &sources.data_root,
            &Instrument::new(identifier, self.frequency),
        )
    }

    /// Cached load of `identifier`. Errors come back as user-facing messages.
    fn load_series(&mut self, identifier: &str) -> Result<Arc<LoadedSeries>, String> {
        let Some(sources) = &self.sources else {
            return Err(UI_TEXT.cp_loading.clone());
        };
        let Some(path) = self.series_path(identifier) else {
            return Err(format!(
                "{}: {}",
                UI_TEXT.error_load,
                Instrument::new(identifier, self.frequency)
            ));
        };

        let stamp = FileStamp::of(&path).ok();
        if let (Some(stamp), Some((failed_stamp, message))) = (stamp, self.failed_loads.get(&path))
        {
            if stamp == *failed_stamp {
                return Err(message.clone());
            }
        }

        match sources.loader.load(&path) {
            Ok(loaded) => {
                self.failed_loads.remove(&path);
                Ok(loaded)
            }
            Err(e) => {
                log::warn!("Failed to load {}: {:#}", path.display(), e);
                let message = describe_error(&e);
                if let Some(stamp) = stamp {
                    self.failed_loads.insert(path, (stamp, message.clone()));
                }
                Err(message)
            }
        }
    }

    fn load_choice(
        &mut self,
        choice: Option<String>,
    ) -> (Option<Arc<LoadedSeries>>, Option<String>) {
        match choice {
            None => (None, None),
            Some(id) => match self.load_series(&id) {
                Ok(loaded) => (Some(loaded), None),
                Err(message) => (None, Some(message)),
            },
        }
    }

    /// Runs the pipeline for the active tab. Each stage recomputes only when
    /// its inputs changed.
    pub(crate) fn sync_pipeline(&mut self) {
        match self.tab {
            Tab::Single => {
                let (source, error) = self.load_choice(self.selected.clone());
                self.single_error = error;
                self.single.set_source(source);
                self.single.recompute(&self.level_settings);
            }
            Tab::Comparison => {
                let (first, first_err) = self.load_choice(self.compare_first.clone());
                let (second, second_err) = self.load_choice(self.compare_second.clone());
                self.comparison_error = first_err.or(second_err);
                self.comparison.set_sources(first, second);
                self.comparison.recompute();
            }
        }
    }

    pub(crate) fn start_refresh(&mut self, path: PathBuf) {
        if self.refresh.is_running() {
            return;
        }
        let Some((coordinator, runtime)) =
            self.sources.as_ref().and_then(|s| s.refresher.clone())
        else {
            return;
        };
        if DF.log_refresh {
            log::info!("refresh: requested for {}", path.display());
        }

        let target = path.clone();
        let promise = Promise::spawn_thread("refresh", move || {
            runtime.block_on(async move { coordinator.refresh(&target).await })
        });
        self.refresh = RefreshStatus::Running { path, promise };
    }

    fn poll_refresh(&mut self, ctx: &Context) {
        self.refresh = match mem::take(&mut self.refresh) {
            RefreshStatus::Running { path, promise } => match promise.try_take() {
                Ok(result) => {
                    let result = result.map(|o| o.bars).map_err(|e| describe_error(&e));
                    if result.is_ok() {
                        self.failed_loads.remove(&path);
                    }
                    RefreshStatus::Finished { path, result }
                }
                Err(promise) => {
                    ctx.request_repaint_after(REFRESH_POLL_INTERVAL);
                    RefreshStatus::Running { path, promise }
                }
            },
            other => other,
        };
    }

    /// Status line for the last refresh of `path`, if any.
    pub(crate) fn refresh_status_for(&self, path: &Path) -> Option<&Result<usize, String>> {
        match &self.refresh {
            RefreshStatus::Finished { path: p, result } if p == path => Some(result),
            _ => None,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);
        self.poll_refresh(ctx);
        self.sync_pipeline();

        self.render_top_panel(ctx);
        self.render_status_panel(ctx);
        match self.tab {
            Tab::Single => self.render_single_tab(ctx),
            Tab::Comparison => self.render_comparison_tab(ctx),
        }
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        eframe::set_value(storage, PERSISTENCE.app.storage_key, self);
    }
}

fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;
    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;
    ctx.set_visuals(visuals);
}
