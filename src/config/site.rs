use crate::domain::ports::Locator;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.renfe.com/es/es";
pub const DEFAULT_CALENDAR_TIMEZONE: &str = "Europe/Madrid";

/// Renfe 網站目前的標記；改版時可在 `[selectors]` 覆寫
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    pub consent_button_id: String,
    pub origin_input_id: String,
    pub origin_suggestion_css: String,
    pub destination_input_id: String,
    pub destination_suggestion_css: String,
    pub date_input_id: String,
    pub one_way_label_text: String,
    pub day_cell_css: String,
    pub next_month_css: String,
    pub apply_button_css: String,
    pub search_button_text: String,
    pub results_container_id: String,
    pub result_row_css: String,
    pub departure_time_css: String,
    pub price_css: String,
    pub no_service_text: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            consent_button_id: "onetrust-accept-btn-handler".to_string(),
            origin_input_id: "origin".to_string(),
            origin_suggestion_css: "#awesomplete_list_1 > li".to_string(),
            destination_input_id: "destination".to_string(),
            destination_suggestion_css: "#awesomplete_list_2 > li".to_string(),
            date_input_id: "first-input".to_string(),
            one_way_label_text: "Viaje solo ida".to_string(),
            day_cell_css: "div.lightpick__day".to_string(),
            next_month_css: "div.lightpick__nav-action-next".to_string(),
            apply_button_css: "button.lightpick__apply-action-sub".to_string(),
            search_button_text: "Buscar billete".to_string(),
            results_container_id: "listaTrenesTBodyIda".to_string(),
            result_row_css: "div.selectedTren".to_string(),
            departure_time_css: "div.trenes > h5".to_string(),
            price_css: "span.precio-final".to_string(),
            no_service_text: "No hay trenes para la fecha seleccionada".to_string(),
        }
    }
}

impl SiteSelectors {
    pub fn consent_button(&self) -> Locator {
        Locator::id(&self.consent_button_id)
    }

    pub fn origin_input(&self) -> Locator {
        Locator::id(&self.origin_input_id)
    }

    pub fn origin_suggestion(&self) -> Locator {
        Locator::css(&self.origin_suggestion_css)
    }

    pub fn destination_input(&self) -> Locator {
        Locator::id(&self.destination_input_id)
    }

    pub fn destination_suggestion(&self) -> Locator {
        Locator::css(&self.destination_suggestion_css)
    }

    pub fn date_input(&self) -> Locator {
        Locator::id(&self.date_input_id)
    }

    pub fn one_way_label(&self) -> Locator {
        Locator::xpath(format!(
            "//label[contains(normalize-space(), '{}')]",
            self.one_way_label_text
        ))
    }

    pub fn next_month(&self) -> Locator {
        Locator::css(&self.next_month_css)
    }

    pub fn apply_button(&self) -> Locator {
        Locator::css(&self.apply_button_css)
    }

    pub fn search_button(&self) -> Locator {
        Locator::xpath(format!(
            "//button[contains(., '{}')]",
            self.search_button_text
        ))
    }

    pub fn results_container(&self) -> Locator {
        Locator::id(&self.results_container_id)
    }

    pub fn result_row(&self) -> Locator {
        Locator::css(&self.result_row_css)
    }

    pub fn departure_time(&self) -> Locator {
        Locator::css(&self.departure_time_css)
    }

    pub fn price(&self) -> Locator {
        Locator::css(&self.price_css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xpath_locators_embed_text() {
        let selectors = SiteSelectors::default();
        assert_eq!(
            selectors.one_way_label(),
            Locator::XPath("//label[contains(normalize-space(), 'Viaje solo ida')]".to_string())
        );
        assert_eq!(
            selectors.search_button(),
            Locator::XPath("//button[contains(., 'Buscar billete')]".to_string())
        );
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let selectors: SiteSelectors = toml::from_str(r#"price_css = "span.price""#).unwrap();
        assert_eq!(selectors.price(), Locator::css("span.price"));
        assert_eq!(selectors.results_container(), Locator::id("listaTrenesTBodyIda"));
    }
}
