use crate::{
    effects::filter::FilterSettings,
    foundation::{
        core::CanvasBounds,
        error::{LayercompError, LayercompResult},
    },
};

/// Engine configuration. Every field has a default, so partial JSON documents are accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub canvas_bounds: CanvasBounds,
    pub filters: FilterSettings,
}

impl EditorSettings {
    pub fn from_json_str(s: &str) -> LayercompResult<Self> {
        let settings: Self = serde_json::from_str(s)
            .map_err(|e| LayercompError::validation(format!("invalid settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> LayercompResult<()> {
        self.canvas_bounds.validate()?;
        self.filters.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/settings.rs"]
mod tests;
