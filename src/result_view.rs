//! State behind the recommendation result view.

use crate::api::{PredictionInput, PredictionResult};
use crate::handoff::{HandoffError, ResultHandoff};
use crate::request_state::{RequestState, Ticket};
use crate::suggestions::Suggestions;

/// Benefit bullets shown for crops without a dedicated list.
const DEFAULT_BENEFITS: [&str; 3] = [
    "Suitable for your conditions",
    "Good agricultural choice",
    "Profitable crop option",
];

/// Key benefits listed under the recommended crop.
pub fn crop_benefits(crop: &str) -> [&'static str; 3] {
    match crop.trim().to_lowercase().as_str() {
        "rice" => [
            "High yield potential",
            "Staple food crop",
            "Grows in wet conditions",
        ],
        "wheat" => [
            "Versatile grain crop",
            "Good market demand",
            "Drought tolerant varieties",
        ],
        "corn" => [
            "High biomass production",
            "Multiple uses",
            "Good feed crop",
        ],
        _ => DEFAULT_BENEFITS,
    }
}

/// Colour band of the confidence badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfidenceTone {
    High,
    Medium,
    Low,
}

impl ConfidenceTone {
    pub fn for_confidence(confidence: f64) -> Self {
        if confidence >= 90.0 {
            Self::High
        } else if confidence >= 75.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Illustrative image reference for `crop`; no image is generated.
pub fn placeholder_image_ref(crop: &str) -> String {
    let text: String = url::form_urlencoded::byte_serialize(crop.as_bytes()).collect();
    format!("/api/placeholder/400/300?text={text}")
}

/// A handed-off result ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayedResult {
    pub result: PredictionResult,
    pub image_ref: String,
    pub benefits: [&'static str; 3],
    pub tone: ConfidenceTone,
}

impl DisplayedResult {
    fn new(result: PredictionResult) -> Self {
        Self {
            image_ref: placeholder_image_ref(&result.crop),
            benefits: crop_benefits(&result.crop),
            tone: ConfidenceTone::for_confidence(result.confidence),
            result,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ResultPhase {
    #[default]
    AwaitingResult,
    /// Nothing was handed off; the user belongs on the form.
    Redirected,
    Displaying(DisplayedResult),
}

/// Work needed to load suggestions for the displayed result.
#[derive(Clone, Debug, PartialEq)]
pub struct SuggestionJob {
    pub ticket: Ticket,
    pub input: PredictionInput,
    pub crop: String,
}

#[derive(Debug, Default)]
pub struct ResultScreen {
    phase: ResultPhase,
    pub suggestions: RequestState<Suggestions>,
}

impl ResultScreen {
    pub fn phase(&self) -> &ResultPhase {
        &self.phase
    }

    pub fn displayed(&self) -> Option<&DisplayedResult> {
        match &self.phase {
            ResultPhase::Displaying(displayed) => Some(displayed),
            _ => None,
        }
    }

    /// Read the handoff and settle on redirect or display.
    ///
    /// Returns the suggestion request to start when a result is shown.
    pub fn mount(&mut self, handoff: &ResultHandoff) -> Option<SuggestionJob> {
        self.suggestions.reset();
        let result = match handoff.get() {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "could not read handed-off recommendation");
                None
            }
        };
        match result {
            Some(result) => {
                self.phase = ResultPhase::Displaying(DisplayedResult::new(result));
                self.begin_suggestions()
            }
            None => {
                self.phase = ResultPhase::Redirected;
                None
            }
        }
    }

    /// Start (or restart) the suggestion request for the displayed result.
    pub fn begin_suggestions(&mut self) -> Option<SuggestionJob> {
        let displayed = self.displayed()?;
        let input = displayed.result.input_data;
        let crop = displayed.result.crop.clone();
        let ticket = self.suggestions.begin();
        Some(SuggestionJob {
            ticket,
            input,
            crop,
        })
    }

    /// Leave the view; late suggestion replies are dropped.
    pub fn unmount(&mut self) {
        self.suggestions.invalidate();
        self.phase = ResultPhase::AwaitingResult;
    }

    /// Clear the handoff so the next mount redirects to the form.
    pub fn retry(&mut self, handoff: &ResultHandoff) -> Result<(), HandoffError> {
        self.unmount();
        self.suggestions.reset();
        handoff.clear()
    }
}
