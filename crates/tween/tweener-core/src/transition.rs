//! Serializable transition descriptions.
//!
//! These carry the data half of [`AnimationParams`] / [`CollectionParams`]
//! so transitions can be stored as JSON; callbacks are attached when the
//! description is turned into params.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationParams;
use crate::collection::{CollectionParams, KeyExtractor};
use crate::easing::Easing;
use crate::error::TweenError;
use crate::Result;
use crate::strategy::MergeStrategy;
use crate::value::State;

fn check_common(time: f64, include: &[String]) -> Result<()> {
    if !(time > 0.0 && time.is_finite()) {
        return Err(TweenError::InvalidDuration { time });
    }
    if include.is_empty() {
        return Err(TweenError::EmptyInclude);
    }
    Ok(())
}

/// A single-entity transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub from: State,
    pub to: State,
    pub include: Vec<String>,
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_strategy: Option<MergeStrategy>,
}

impl TransitionSpec {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        check_common(self.time, &self.include)
    }

    pub fn into_params(self, on_update: impl FnMut(State) + 'static) -> AnimationParams {
        let mut params =
            AnimationParams::new(self.from, self.to, self.time, on_update).include(self.include);
        params.easing = self.easing.map(Into::into);
        params.merge_strategy = self.merge_strategy;
        params
    }
}

/// A keyed-collection transition. Entities are keyed by the field named `key`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionTransitionSpec {
    pub from: Vec<State>,
    pub to: Vec<State>,
    pub include: Vec<String>,
    pub time: f64,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_strategy: Option<MergeStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_merge_strategy: Option<MergeStrategy>,
}

impl CollectionTransitionSpec {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        check_common(self.time, &self.include)
    }

    pub fn into_params(self, on_update: impl FnMut(Vec<State>) + 'static) -> CollectionParams {
        let mut params = CollectionParams::new(
            self.from,
            self.to,
            self.time,
            KeyExtractor::field(self.key),
            on_update,
        )
        .include(self.include);
        params.easing = self.easing.map(Into::into);
        params.merge_strategy = self.merge_strategy;
        params.array_merge_strategy = self.array_merge_strategy;
        params
    }
}
