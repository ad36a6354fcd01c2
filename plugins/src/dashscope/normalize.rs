//! Generic submission -> DashScope request body.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use taskrelay_core::api::{TaskError, TaskSubmission};

use super::models::{VendorInput, VendorParameters, VendorRequest};

pub const DEFAULT_DURATION_SECS: u32 = 5;
pub const BASELINE_RESOLUTION: &str = "720P";
const RESOLUTION_SUFFIX: char = 'P';

/// First matching prefix wins, so longer prefixes must precede shorter ones.
const MODEL_RESOLUTION_DEFAULTS: &[(&str, &str)] = &[
    ("wan2.5", "1080P"),
    ("wan2.2-i2v-flash", "720P"),
    ("wan2.2-i2v-plus", "1080P"),
];

/// Typed partial override parsed from submission metadata.
///
/// Mirrors the request layout; every field is optional and a present field
/// replaces whatever the normalizer derived. Empty strings and zero numbers
/// count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestOverrides {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub input: Option<InputOverrides>,
    #[serde(default)]
    pub parameters: Option<ParameterOverrides>,
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputOverrides {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub first_frame_url: Option<String>,
    #[serde(default)]
    pub last_frame_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParameterOverrides {
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub prompt_extend: Option<bool>,
    #[serde(default)]
    pub watermark: Option<bool>,
    #[serde(default)]
    pub audio: Option<bool>,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

impl RequestOverrides {
    /// Known keys with the wrong JSON type are rejected; unknown keys are kept
    /// aside so the caller can report them.
    pub fn from_metadata(metadata: &Map<String, Value>) -> Result<Self, TaskError> {
        serde_json::from_value(Value::Object(metadata.clone()))
            .map_err(|e| TaskError::InvalidRequest(format!("metadata: {e}")))
    }

    /// Dotted paths of keys the vendor schema does not know.
    pub fn unknown_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.unknown.keys().cloned().collect();
        if let Some(input) = &self.input {
            keys.extend(input.unknown.keys().map(|k| format!("input.{k}")));
        }
        if let Some(params) = &self.parameters {
            keys.extend(params.unknown.keys().map(|k| format!("parameters.{k}")));
        }
        keys
    }

    pub fn apply(&self, req: &mut VendorRequest) {
        if let Some(model) = non_empty(&self.model) {
            req.model = model.clone();
        }
        if let Some(input) = &self.input {
            input.apply(&mut req.input);
        }
        if let Some(params) = &self.parameters {
            params.apply(&mut req.parameters);
        }
    }
}

fn non_empty(src: &Option<String>) -> Option<&String> {
    src.as_ref().filter(|s| !s.trim().is_empty())
}

fn overlay(dst: &mut Option<String>, src: &Option<String>) {
    if let Some(value) = non_empty(src) {
        *dst = Some(value.clone());
    }
}

impl InputOverrides {
    fn apply(&self, input: &mut VendorInput) {
        overlay(&mut input.prompt, &self.prompt);
        overlay(&mut input.img_url, &self.img_url);
        overlay(&mut input.first_frame_url, &self.first_frame_url);
        overlay(&mut input.last_frame_url, &self.last_frame_url);
        overlay(&mut input.audio_url, &self.audio_url);
        overlay(&mut input.negative_prompt, &self.negative_prompt);
        overlay(&mut input.template, &self.template);
    }
}

impl ParameterOverrides {
    fn apply(&self, params: &mut VendorParameters) {
        if let Some(resolution) = non_empty(&self.resolution) {
            params.resolution = resolution.clone();
        }
        overlay(&mut params.size, &self.size);
        if let Some(duration) = positive_secs(self.duration) {
            params.duration = duration;
        }
        if let Some(prompt_extend) = self.prompt_extend {
            params.prompt_extend = prompt_extend;
        }
        if let Some(watermark) = self.watermark {
            params.watermark = watermark;
        }
        if self.audio.is_some() {
            params.audio = self.audio;
        }
        if let Some(seed) = self.seed.filter(|s| *s > 0) {
            params.seed = Some(seed);
        }
    }
}

/// Upper-cases an explicit size and makes sure it ends with the unit
/// suffix; without one, picks the model's default. Malformed sizes are
/// passed through for the vendor to judge.
pub fn resolve_resolution(size: Option<&str>, model: &str) -> String {
    match size.map(str::trim).filter(|s| !s.is_empty()) {
        Some(size) => {
            let mut resolution = size.to_uppercase();
            if !resolution.ends_with(RESOLUTION_SUFFIX) {
                resolution.push(RESOLUTION_SUFFIX);
            }
            resolution
        }
        None => MODEL_RESOLUTION_DEFAULTS
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix))
            .map(|(_, resolution)| *resolution)
            .unwrap_or(BASELINE_RESOLUTION)
            .to_string(),
    }
}

fn positive_secs(duration: Option<i64>) -> Option<u32> {
    duration
        .filter(|d| *d > 0)
        .map(|d| u32::try_from(d).unwrap_or(u32::MAX))
}

/// Any value of zero or less falls back to the channel default.
pub fn resolve_duration(duration: Option<i64>) -> u32 {
    positive_secs(duration).unwrap_or(DEFAULT_DURATION_SECS)
}

/// Builds the vendor body: derived fields and fixed defaults first, then
/// the metadata overrides on top.
pub fn normalize(sub: &TaskSubmission, overrides: Option<&RequestOverrides>) -> VendorRequest {
    let mut req = VendorRequest {
        model: sub.model.clone(),
        input: VendorInput {
            prompt: sub.prompt.clone().filter(|p| !p.is_empty()),
            img_url: sub.input_reference.clone().filter(|r| !r.is_empty()),
            ..Default::default()
        },
        parameters: VendorParameters {
            resolution: resolve_resolution(sub.size.as_deref(), &sub.model),
            size: None,
            duration: resolve_duration(sub.duration),
            prompt_extend: true,
            watermark: false,
            audio: None,
            seed: None,
        },
    };

    if let Some(overrides) = overrides {
        let unknown = overrides.unknown_keys();
        if !unknown.is_empty() {
            tracing::warn!(
                target: "taskrelay.task",
                stage = "dashscope.normalize.unknown_metadata",
                model = %sub.model,
                keys = ?unknown,
                "ignoring metadata keys outside the request schema"
            );
        }
        overrides.apply(&mut req);
    }

    tracing::debug!(
        target: "taskrelay.task",
        stage = "dashscope.normalize.out",
        model = %req.model,
        resolution = %req.parameters.resolution,
        duration = req.parameters.duration,
        has_image = req.input.img_url.is_some()
    );
    req
}
