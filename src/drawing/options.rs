//! Drawing assembler options

/// Station symbol scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerScheme {
    None,
    /// Small circle at every station
    #[default]
    Circle,
    /// Triangle drawn as a line marker
    Triangle,
    /// Independent triangle symbol plus an annotation label with the
    /// station's full name
    TriangleSymbol,
}

/// Which stations get a name label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelPolicy {
    #[default]
    Off,
    /// Only stations that do not belong to any named survey
    OutsideSurveys,
    All,
}

/// How survey structure is carried into the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurveyHandling {
    /// One group per survey, annotation names in `station@survey` form
    #[default]
    CreateOnDemand,
    /// Everything in the root group, names as decoded
    Ignore,
}

/// Options of one assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingOptions {
    pub markers: MarkerScheme,
    pub station_names: LabelPolicy,
    pub scale_bar: bool,
    pub surveys: SurveyHandling,
    /// Start a new polyline where the survey changes
    pub break_on_survey: bool,
    pub show_surface: bool,
    pub show_splays: bool,
    pub show_duplicates: bool,
}

impl Default for DrawingOptions {
    fn default() -> Self {
        Self {
            markers: MarkerScheme::default(),
            station_names: LabelPolicy::default(),
            scale_bar: true,
            surveys: SurveyHandling::default(),
            break_on_survey: true,
            show_surface: true,
            show_splays: true,
            show_duplicates: true,
        }
    }
}

impl DrawingOptions {
    pub fn with_markers(mut self, markers: MarkerScheme) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_station_names(mut self, policy: LabelPolicy) -> Self {
        self.station_names = policy;
        self
    }

    pub fn with_scale_bar(mut self, scale_bar: bool) -> Self {
        self.scale_bar = scale_bar;
        self
    }

    pub fn with_surveys(mut self, surveys: SurveyHandling) -> Self {
        self.surveys = surveys;
        self
    }

    pub fn with_break_on_survey(mut self, enabled: bool) -> Self {
        self.break_on_survey = enabled;
        self
    }

    pub fn with_surface(mut self, show: bool) -> Self {
        self.show_surface = show;
        self
    }

    pub fn with_splays(mut self, show: bool) -> Self {
        self.show_splays = show;
        self
    }

    pub fn with_duplicates(mut self, show: bool) -> Self {
        self.show_duplicates = show;
        self
    }
}
