//! Page assembly
//!
//! Builds the element tree for a page description, sets up every slider and
//! the calculator against one [`PageState`], and routes host input to them.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use roi_core::config::attr;
use roi_core::{PageState, SalaryPeriod};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::calculator::{
    CalculatorConfig, OutputRole, RoiCalculator, CHECKED_ATTR, SALARY_PERIOD_ROLE, VALUE_ATTR,
};
use crate::dom::{parts, Document, Element, SLIDER_PART_ATTR};
use crate::slider::SliderController;

/// Markup of one slider: a label and its wrapper attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderMarkup {
    pub label: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl SliderMarkup {
    pub fn new(label: impl Into<String>, role: &str) -> Self {
        Self {
            label: label.into(),
            attributes: BTreeMap::new(),
        }
        .attr(attr::ROLE, role)
    }

    /// Builder: set a wrapper attribute
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    fn render(&self) -> Element {
        let mut wrapper = Element::new("div").with_attr(SLIDER_PART_ATTR, parts::WRAPPER);
        for (name, value) in &self.attributes {
            wrapper = wrapper.with_attr(name.as_str(), value.as_str());
        }

        let track = Element::new("div")
            .with_attr(SLIDER_PART_ATTR, parts::TRACK)
            .with_child(Element::new("div").with_attr(SLIDER_PART_ATTR, parts::FILL))
            .with_child(Element::new("div").with_attr(SLIDER_PART_ATTR, parts::HANDLE));

        wrapper
            .with_child(Element::new("label").with_text(self.label.as_str()))
            .with_child(track)
            .with_child(Element::new("span").with_attr(SLIDER_PART_ATTR, parts::DISPLAY))
            .with_child(Element::new("input").with_attr(SLIDER_PART_ATTR, parts::INPUT))
    }
}

/// A whole page: sliders, calculator settings and the initial salary period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub sliders: Vec<SliderMarkup>,
    pub calculator: CalculatorConfig,
    pub salary_period: SalaryPeriod,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sliders: vec![
                SliderMarkup::new("Number of SKUs", "sku-count")
                    .attr(attr::SCALE, "[10, 100, 500, 1000, 5000, 10000, 50000]")
                    .attr(attr::START, "1000")
                    .attr(attr::CURRENCY, ""),
                SliderMarkup::new("Average item value", "item-value")
                    .attr(attr::SCALE, "[1, 10000]")
                    .attr(attr::KIND, "log")
                    .attr(attr::START, "100")
                    .attr(attr::CURRENCY, "€"),
                SliderMarkup::new("Salary", "salary")
                    .attr(attr::SCALE, "[500, 1000, 2000, 3000, 5000, 10000]")
                    .attr(attr::START, "2000"),
                SliderMarkup::new("Monthly transactions", "transactions")
                    .attr(attr::SCALE, "[100, 500, 1000, 2000, 5000, 15000, 30000, 50000]")
                    .attr(attr::START, "1000")
                    .attr(attr::SNAP, "true")
                    .attr(attr::CURRENCY, ""),
            ],
            calculator: CalculatorConfig::default(),
            salary_period: SalaryPeriod::Monthly,
        }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A labelled slider on the page
#[derive(Debug)]
pub struct PageSlider {
    pub label: String,
    pub controller: SliderController,
}

/// A live page
pub struct Page {
    state: PageState,
    document: Document,
    sliders: Vec<PageSlider>,
    salary_radios: Vec<(SalaryPeriod, Element)>,
    calculator: Arc<RoiCalculator>,
}

impl Page {
    /// Render `config` and set up its widgets.
    ///
    /// A slider that cannot be set up is logged and left out; the rest of
    /// the page keeps working.
    pub fn build(config: PageConfig) -> Self {
        let state = PageState::new();
        let document = Document::new();

        let wrappers: Vec<(String, Element)> = config
            .sliders
            .iter()
            .map(|markup| {
                let wrapper = markup.render();
                document.append(wrapper.clone());
                (markup.label.clone(), wrapper)
            })
            .collect();

        let salary_radios: Vec<(SalaryPeriod, Element)> =
            [(SalaryPeriod::Monthly, "monthly"), (SalaryPeriod::Yearly, "yearly")]
                .into_iter()
                .map(|(period, value)| {
                    let radio = Element::new("input")
                        .with_attr(attr::ROLE, SALARY_PERIOD_ROLE)
                        .with_attr(VALUE_ATTR, value);
                    if period == config.salary_period {
                        radio.set_attribute(CHECKED_ATTR, "");
                    }
                    document.append(radio.clone());
                    (period, radio)
                })
                .collect();

        for role in OutputRole::ALL {
            document.append(Element::new("span").with_attr(attr::ROLE, role.role()));
        }

        let mut sliders = Vec::with_capacity(wrappers.len());
        for (label, wrapper) in wrappers {
            match SliderController::setup(&wrapper, &state) {
                Ok(controller) => sliders.push(PageSlider { label, controller }),
                Err(e) => error!("Skipping slider '{}': {}", label, e),
            }
        }

        let calculator = RoiCalculator::setup(&document, &state, config.calculator);
        for slider in &sliders {
            calculator.attach_slider(&slider.controller);
        }

        info!(sliders = sliders.len(), "Page ready");
        Self {
            state,
            document,
            sliders,
            salary_radios,
            calculator,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn sliders(&self) -> &[PageSlider] {
        &self.sliders
    }

    pub fn sliders_mut(&mut self) -> &mut [PageSlider] {
        &mut self.sliders
    }

    /// The slider publishing under `id`
    pub fn slider_mut(&mut self, id: &str) -> Option<&mut SliderController> {
        self.sliders
            .iter_mut()
            .map(|slider| &mut slider.controller)
            .find(|controller| controller.id() == id)
    }

    pub fn calculator(&self) -> &Arc<RoiCalculator> {
        &self.calculator
    }

    /// Check the radio for `period` and notify the calculator
    pub fn select_salary_period(&self, period: SalaryPeriod) {
        for (radio_period, radio) in &self.salary_radios {
            if *radio_period == period {
                radio.set_attribute(CHECKED_ATTR, "");
            } else {
                radio.remove_attribute(CHECKED_ATTR);
            }
        }
        self.calculator.salary_period_changed();
    }

    /// Text of the first output node with `role`
    pub fn output_text(&self, role: OutputRole) -> Option<String> {
        self.document.query(attr::ROLE, role.role()).map(|node| node.text())
    }

    /// Drive the calculator's polling fallback
    pub fn poll(&self, now: Instant) -> bool {
        self.calculator.poll(now)
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("sliders", &self.sliders.len())
            .field("calculator", &self.calculator)
            .finish()
    }
}
