//! ROI calculator widget
//!
//! Keeps a [`CalculatorInputs`] snapshot up to date from every available
//! channel (value bus, slider element events, display text mutations, slider
//! releases and a polling fallback) and renders the derived figures into
//! every matching output element. Each trigger recomputes and re-renders
//! unconditionally.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use roi_core::config::attr;
use roi_core::events::events::{SliderChanged, SliderReleased};
use roi_core::{
    format_currency, parse_display, CalculatorInputs, CurrencyFormat, InputField, PageState,
    PlanTable, PublishedValue, RoiResults, SalaryPeriod, SavingsModel, StandardSavingsModel,
    ValueSubscriber,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dom::{parts, Document, Element, MutationObserver, SLIDER_PART_ATTR};
use crate::slider::SliderController;
use crate::timer::{FallbackTimer, DEFAULT_POLL_INTERVAL};

/// Role of the salary period radio inputs
pub const SALARY_PERIOD_ROLE: &str = "salary-period";

/// Attribute marking the selected radio
pub const CHECKED_ATTR: &str = "checked";

/// Attribute holding a radio's value
pub const VALUE_ATTR: &str = "value";

/// Attribute receiving the action button link
pub const HREF_ATTR: &str = "href";

/// Output element roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputRole {
    InventoryValue,
    Savings,
    Plan,
    PlanPrice,
    MonthlySavings,
    ActionButton,
}

impl OutputRole {
    pub const ALL: [OutputRole; 6] = [
        OutputRole::InventoryValue,
        OutputRole::Savings,
        OutputRole::Plan,
        OutputRole::PlanPrice,
        OutputRole::MonthlySavings,
        OutputRole::ActionButton,
    ];

    pub fn role(self) -> &'static str {
        match self {
            OutputRole::InventoryValue => "inventory-value",
            OutputRole::Savings => "savings",
            OutputRole::Plan => "plan",
            OutputRole::PlanPrice => "plan-price",
            OutputRole::MonthlySavings => "monthly-savings",
            OutputRole::ActionButton => "action-button",
        }
    }
}

/// Label and link of the call-to-action button.
///
/// `{plan}` is replaced with the plan name and `{slug}` with its slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionButtonConfig {
    pub label_template: String,
    pub link_template: String,
}

impl Default for ActionButtonConfig {
    fn default() -> Self {
        Self {
            label_template: "Start with {plan}".to_string(),
            link_template: "/signup?plan={slug}".to_string(),
        }
    }
}

/// Calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Savings formula
    pub model: StandardSavingsModel,

    /// Plans, ascending by capacity
    pub plans: PlanTable,

    /// Rendering of monetary outputs
    pub currency: CurrencyFormat,

    /// Polling fallback period; `None` or `0` disables polling
    pub poll_interval_ms: Option<u64>,

    /// Call-to-action button
    pub action_button: ActionButtonConfig,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            model: StandardSavingsModel::default(),
            plans: PlanTable::default(),
            currency: CurrencyFormat::default(),
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL.as_millis() as u64),
            action_button: ActionButtonConfig::default(),
        }
    }
}

/// A slider display feeding one input field
#[derive(Debug)]
struct WatchedDisplay {
    field: InputField,
    element: Element,
    /// Text most recently parsed into the field
    applied: Mutex<Option<String>>,
}

impl WatchedDisplay {
    /// Record `text` as applied. Returns `false` when it was already applied.
    fn mark_applied(&self, text: &str) -> bool {
        let mut applied = self.applied.lock();
        if applied.as_deref() == Some(text) {
            return false;
        }
        *applied = Some(text.to_string());
        true
    }
}

/// Output elements, per role
#[derive(Debug, Clone, Default)]
struct OutputNodes {
    nodes: Vec<(OutputRole, Vec<Element>)>,
}

impl OutputNodes {
    fn locate(document: &Document) -> Self {
        Self {
            nodes: OutputRole::ALL
                .into_iter()
                .map(|role| (role, document.query_all(attr::ROLE, role.role())))
                .collect(),
        }
    }

    fn get(&self, role: OutputRole) -> &[Element] {
        self.nodes
            .iter()
            .find(|(r, _)| *r == role)
            .map_or(&[], |(_, nodes)| nodes.as_slice())
    }

    fn write(&self, role: OutputRole, text: &str) {
        for node in self.get(role) {
            node.set_text(text);
        }
    }
}

/// The ROI calculator
pub struct RoiCalculator {
    model: Box<dyn SavingsModel>,
    plans: PlanTable,
    currency: CurrencyFormat,
    action_button: ActionButtonConfig,
    inputs: RwLock<CalculatorInputs>,
    displays: Vec<WatchedDisplay>,
    salary_radios: Vec<Element>,
    outputs: OutputNodes,
    timer: Mutex<Option<FallbackTimer>>,
    watchers: Mutex<Vec<Arc<dyn MutationObserver>>>,
    last_results: RwLock<Option<RoiResults>>,
}

impl RoiCalculator {
    /// Build a calculator over `document` with the configured standard model.
    pub fn setup(document: &Document, page: &PageState, config: CalculatorConfig) -> Arc<Self> {
        let model = Box::new(config.model.clone());
        Self::with_model(document, page, config, model)
    }

    /// Build a calculator with a custom savings formula.
    ///
    /// Locates display and output elements, subscribes to the page's value
    /// bus, observes every display text, catches up on values published
    /// before it existed, and renders once.
    pub fn with_model(
        document: &Document,
        page: &PageState,
        config: CalculatorConfig,
        model: Box<dyn SavingsModel>,
    ) -> Arc<Self> {
        let displays: Vec<WatchedDisplay> = InputField::ALL
            .into_iter()
            .filter_map(|field| {
                document
                    .query(attr::ROLE, field.role())
                    .and_then(|wrapper| wrapper.query(SLIDER_PART_ATTR, parts::DISPLAY))
                    .map(|element| WatchedDisplay {
                        field,
                        element,
                        applied: Mutex::new(None),
                    })
            })
            .collect();

        let calculator = Arc::new(Self {
            model,
            plans: config.plans,
            currency: config.currency,
            action_button: config.action_button,
            inputs: RwLock::new(CalculatorInputs::new()),
            displays,
            salary_radios: document.query_all(attr::ROLE, SALARY_PERIOD_ROLE),
            outputs: OutputNodes::locate(document),
            timer: Mutex::new(
                config
                    .poll_interval_ms
                    .filter(|ms| *ms > 0)
                    .map(|ms| FallbackTimer::start(Duration::from_millis(ms), Instant::now())),
            ),
            watchers: Mutex::new(Vec::new()),
            last_results: RwLock::new(None),
        });

        let subscriber: Arc<dyn ValueSubscriber> = calculator.clone();
        page.bus.subscribe_weak(&subscriber);
        calculator.watch_displays();

        calculator.read_displayed_values();
        for published in page.bus.snapshot() {
            calculator.apply(&published.id, published.value);
        }
        calculator.read_salary_period();
        calculator.refresh();

        info!(
            displays = calculator.displays.len(),
            polling = ?calculator.poll_interval(),
            "ROI calculator initialized"
        );
        calculator
    }

    /// Refresh on this slider's element events and releases
    pub fn attach_slider(self: &Arc<Self>, slider: &SliderController) {
        let weak = Arc::downgrade(self);
        slider.events().on(move |event: &SliderChanged| {
            if let Some(calculator) = weak.upgrade() {
                calculator.on_value(&event.id, event.value);
            }
        });

        let weak = Arc::downgrade(self);
        slider.events().on(move |_: &SliderReleased| {
            if let Some(calculator) = weak.upgrade() {
                calculator.slider_released();
            }
        });
    }

    /// Route a published value to its input field and refresh.
    ///
    /// Returns `false`, without refreshing, for ids that match no field.
    pub fn on_value(&self, id: &str, value: f64) -> bool {
        if !self.apply(id, value) {
            debug!(id, "Ignoring value for unknown input");
            return false;
        }
        self.refresh();
        true
    }

    /// A slider interaction ended: re-read every display and refresh
    pub fn slider_released(&self) {
        self.read_displayed_values();
        self.refresh();
    }

    /// The salary period radios changed
    pub fn salary_period_changed(&self) {
        self.read_salary_period();
        self.refresh();
    }

    pub fn set_salary_period(&self, period: SalaryPeriod) {
        self.inputs.write().salary_period = period;
        self.refresh();
    }

    /// Polling fallback: when the interval has elapsed, re-read displayed
    /// values and the salary period, then refresh. Returns whether it ran.
    pub fn poll(&self, now: Instant) -> bool {
        let due = self
            .timer
            .lock()
            .as_mut()
            .is_some_and(|timer| timer.fire_if_due(now));
        if !due {
            return false;
        }

        self.read_displayed_values();
        self.read_salary_period();
        self.refresh();
        true
    }

    /// Time until the next poll, if polling is enabled
    pub fn poll_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.lock().as_ref().map(|timer| timer.remaining(now))
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.timer.lock().as_ref().map(FallbackTimer::interval)
    }

    /// Parse watched display texts into their input fields.
    ///
    /// Only text that changed since it was last applied is parsed, so a
    /// compact display (`13K` for 12 600) never overrides the exact value
    /// received from the bus. Empty displays are skipped; unreadable text
    /// counts as 0.
    pub fn read_displayed_values(&self) {
        for display in &self.displays {
            let text = display.element.text();
            self.apply_display_text(display, &text);
        }
    }

    /// Recompute from the current inputs and render every output
    pub fn refresh(&self) -> RoiResults {
        let inputs = self.inputs.read().clone();
        let results = self.model.compute(&inputs, &self.plans);
        debug!(
            savings = results.savings,
            plan = %results.plan.name,
            monthly_savings = results.monthly_savings,
            "ROI refreshed"
        );

        self.render(&results);
        *self.last_results.write() = Some(results.clone());
        results
    }

    pub fn inputs(&self) -> CalculatorInputs {
        self.inputs.read().clone()
    }

    pub fn last_results(&self) -> Option<RoiResults> {
        self.last_results.read().clone()
    }

    fn apply(&self, id: &str, value: f64) -> bool {
        match InputField::from_role(id) {
            Some(field) => {
                self.inputs.write().set(field, value);
                true
            }
            None => false,
        }
    }

    fn apply_display_text(&self, display: &WatchedDisplay, text: &str) {
        if text.is_empty() || !display.mark_applied(text) {
            return;
        }
        self.inputs.write().set(display.field, parse_display(text));
    }

    fn read_salary_period(&self) {
        let selected = self
            .salary_radios
            .iter()
            .find(|radio| radio.has_attribute(CHECKED_ATTR))
            .and_then(|radio| radio.attribute(VALUE_ATTR))
            .and_then(|value| SalaryPeriod::from_value(&value));

        if let Some(period) = selected {
            self.inputs.write().salary_period = period;
        }
    }

    fn watch_displays(self: &Arc<Self>) {
        let mut watchers = self.watchers.lock();
        for (index, display) in self.displays.iter().enumerate() {
            let watcher: Arc<dyn MutationObserver> = Arc::new(DisplayWatcher {
                index,
                calculator: Arc::downgrade(self),
            });
            display.element.observe_text(&watcher);
            watchers.push(watcher);
        }
    }

    fn render(&self, results: &RoiResults) {
        let money = |value: f64| format_currency(value, &self.currency);

        self.outputs
            .write(OutputRole::InventoryValue, &money(results.inventory_value));
        self.outputs.write(OutputRole::Savings, &money(results.savings));
        self.outputs.write(OutputRole::Plan, &results.plan.name);
        self.outputs.write(OutputRole::PlanPrice, &money(results.plan.price));
        self.outputs
            .write(OutputRole::MonthlySavings, &money(results.monthly_savings));

        let fill = |template: &str| {
            template
                .replace("{plan}", &results.plan.name)
                .replace("{slug}", &results.plan.slug())
        };
        let label = fill(&self.action_button.label_template);
        let link = fill(&self.action_button.link_template);
        for button in self.outputs.get(OutputRole::ActionButton) {
            button.set_text(label.as_str());
            button.set_attribute(HREF_ATTR, link.as_str());
        }
    }
}

impl ValueSubscriber for RoiCalculator {
    fn on_value_published(&self, published: &PublishedValue) {
        self.on_value(&published.id, published.value);
    }
}

impl std::fmt::Debug for RoiCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoiCalculator")
            .field("inputs", &*self.inputs.read())
            .field("plans", &self.plans)
            .field("displays", &self.displays.len())
            .finish()
    }
}

/// Feeds one display's text into its input field
struct DisplayWatcher {
    index: usize,
    calculator: Weak<RoiCalculator>,
}

impl MutationObserver for DisplayWatcher {
    fn on_text_changed(&self, _element: &Element, text: &str) {
        let Some(calculator) = self.calculator.upgrade() else {
            return;
        };
        let Some(display) = calculator.displays.get(self.index) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        calculator.apply_display_text(display, text);
        calculator.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(role: OutputRole) -> Element {
        Element::new("span").with_attr(attr::ROLE, role.role())
    }

    fn display_for(role: &str, text: &str) -> (Element, Element) {
        let display = Element::new("span")
            .with_attr(SLIDER_PART_ATTR, parts::DISPLAY)
            .with_text(text);
        let wrapper = Element::new("div")
            .with_attr(attr::ROLE, role)
            .with_child(display.clone());
        (wrapper, display)
    }

    fn document_with_outputs() -> Document {
        let document = Document::new();
        for role in OutputRole::ALL {
            document.append(output(role));
        }
        document
    }

    fn text_of(document: &Document, role: OutputRole) -> Vec<String> {
        document
            .query_all(attr::ROLE, role.role())
            .iter()
            .map(Element::text)
            .collect()
    }

    #[test]
    fn test_initial_render_from_defaults() {
        let document = document_with_outputs();
        let page = PageState::new();
        let calculator = RoiCalculator::setup(&document, &page, CalculatorConfig::default());

        let results = calculator.last_results().unwrap();
        assert_eq!(results.plan.name, "Basic");
        assert_eq!(text_of(&document, OutputRole::InventoryValue), vec!["100\u{202f}000\u{a0}€"]);
        assert_eq!(text_of(&document, OutputRole::Savings), vec!["35\u{202f}600\u{a0}€"]);
        assert_eq!(text_of(&document, OutputRole::Plan), vec!["Basic"]);
        assert_eq!(text_of(&document, OutputRole::PlanPrice), vec!["350\u{a0}€"]);
        assert_eq!(text_of(&document, OutputRole::MonthlySavings), vec!["35\u{202f}250\u{a0}€"]);

        let button = document.query(attr::ROLE, "action-button").unwrap();
        assert_eq!(button.text(), "Start with Basic");
        assert_eq!(button.attribute(HREF_ATTR).as_deref(), Some("/signup?plan=basic"));
    }

    #[test]
    fn test_all_matching_outputs_receive_text() {
        let document = document_with_outputs();
        document.append(output(OutputRole::Plan));
        let page = PageState::new();
        let _calculator = RoiCalculator::setup(&document, &page, CalculatorConfig::default());

        assert_eq!(text_of(&document, OutputRole::Plan), vec!["Basic", "Basic"]);
    }

    #[test]
    fn test_bus_notifications_route_by_role() {
        let document = document_with_outputs();
        let page = PageState::new();
        let calculator = RoiCalculator::setup(&document, &page, CalculatorConfig::default());

        page.bus.publish("transactions", 40_000.0);
        assert_eq!(text_of(&document, OutputRole::Plan), vec!["Enterprise Advanced"]);

        page.bus.publish(roi_core::UNIDENTIFIED_SLIDER_ID, 5.0);
        assert_eq!(calculator.inputs(), CalculatorInputs::new().with(InputField::Transactions, 40_000.0));
    }

    #[test]
    fn test_late_calculator_catches_up() {
        let document = document_with_outputs();
        let page = PageState::new();
        page.bus.publish("sku-count", 2_000.0);

        let calculator = RoiCalculator::setup(&document, &page, CalculatorConfig::default());
        assert_eq!(calculator.inputs().get(InputField::SkuCount), 2_000.0);
        assert_eq!(text_of(&document, OutputRole::InventoryValue), vec!["200\u{202f}000\u{a0}€"]);
    }

    #[test]
    fn test_display_mutation_triggers_refresh() {
        let document = document_with_outputs();
        let (wrapper, display) = display_for("item-value", "100€");
        document.append(wrapper);
        let page = PageState::new();
        let calculator = RoiCalculator::setup(&document, &page, CalculatorConfig::default());

        display.set_text("1.500€");
        assert_eq!(calculator.inputs().get(InputField::ItemValue), 1_500.0);
        assert_eq!(text_of(&document, OutputRole::InventoryValue), vec!["1\u{202f}500\u{202f}000\u{a0}€"]);
    }

    #[test]
    fn test_polling_fallback() {
        let document = document_with_outputs();
        let (wrapper, display) = display_for("salary", "2.000€");
        document.append(wrapper);
        let page = PageState::new();
        let config = CalculatorConfig {
            poll_interval_ms: Some(100),
            ..Default::default()
        };
        let calculator = RoiCalculator::setup(&document, &page, config);

        display.replace_text("3K€");
        assert_eq!(calculator.inputs().get(InputField::Salary), 2_000.0);

        let later = Instant::now() + Duration::from_millis(150);
        assert!(calculator.poll(later));
        assert_eq!(calculator.inputs().get(InputField::Salary), 3_000.0);
        assert!(!calculator.poll(later));
    }

    #[test]
    fn test_poll_keeps_exact_bus_value() {
        let document = document_with_outputs();
        let (wrapper, display) = display_for("sku-count", "1.000");
        document.append(wrapper);
        let page = PageState::new();
        let config = CalculatorConfig {
            poll_interval_ms: Some(100),
            ..Default::default()
        };
        let calculator = RoiCalculator::setup(&document, &page, config);

        // A slider writes its compact text before publishing the exact value
        display.set_text("13K");
        page.bus.publish("sku-count", 12_600.0);
        assert_eq!(calculator.inputs().get(InputField::SkuCount), 12_600.0);

        assert!(calculator.poll(Instant::now() + Duration::from_millis(150)));
        assert_eq!(calculator.inputs().get(InputField::SkuCount), 12_600.0);
        calculator.slider_released();
        assert_eq!(calculator.inputs().get(InputField::SkuCount), 12_600.0);
        assert_eq!(text_of(&document, OutputRole::InventoryValue), vec!["1\u{202f}260\u{202f}000\u{a0}€"]);
    }

    #[test]
    fn test_zero_poll_interval_disables_polling() {
        let document = document_with_outputs();
        let page = PageState::new();
        let config: CalculatorConfig = serde_json::from_str(r#"{"poll_interval_ms": 0}"#).unwrap();
        let calculator = RoiCalculator::setup(&document, &page, config);

        assert_eq!(calculator.poll_interval(), None);
        assert_eq!(calculator.poll_remaining(Instant::now()), None);
    }

    #[test]
    fn test_polling_disabled() {
        let document = document_with_outputs();
        let page = PageState::new();
        let config = CalculatorConfig {
            poll_interval_ms: None,
            ..Default::default()
        };
        let calculator = RoiCalculator::setup(&document, &page, config);

        assert_eq!(calculator.poll_interval(), None);
        assert!(!calculator.poll(Instant::now() + Duration::from_secs(60)));
    }

    #[test]
    fn test_salary_period_radios() {
        let document = document_with_outputs();
        let monthly = Element::new("input")
            .with_attr(attr::ROLE, SALARY_PERIOD_ROLE)
            .with_attr(VALUE_ATTR, "monthly");
        let yearly = Element::new("input")
            .with_attr(attr::ROLE, SALARY_PERIOD_ROLE)
            .with_attr(VALUE_ATTR, "yearly")
            .with_attr(CHECKED_ATTR, "");
        document.append(monthly.clone());
        document.append(yearly.clone());

        let page = PageState::new();
        let calculator = RoiCalculator::setup(&document, &page, CalculatorConfig::default());
        assert_eq!(calculator.inputs().salary_period, SalaryPeriod::Yearly);
        assert!((calculator.last_results().unwrap().monthly_salary - 2_000.0 / 12.0).abs() < 1e-9);

        yearly.remove_attribute(CHECKED_ATTR);
        monthly.set_attribute(CHECKED_ATTR, "");
        calculator.salary_period_changed();
        assert_eq!(calculator.inputs().salary_period, SalaryPeriod::Monthly);
    }

    struct FlatFee;

    impl SavingsModel for FlatFee {
        fn compute(&self, inputs: &CalculatorInputs, plans: &PlanTable) -> RoiResults {
            let plan = plans.largest().clone();
            RoiResults {
                inventory_value: 0.0,
                monthly_salary: inputs.monthly_salary(),
                savings: 1_000.0,
                monthly_savings: 1_000.0 - plan.price,
                plan,
            }
        }
    }

    #[test]
    fn test_custom_model() {
        let document = document_with_outputs();
        let page = PageState::new();
        let calculator = RoiCalculator::with_model(
            &document,
            &page,
            CalculatorConfig::default(),
            Box::new(FlatFee),
        );

        assert_eq!(calculator.last_results().unwrap().plan.name, "Enterprise Advanced");
        assert_eq!(text_of(&document, OutputRole::MonthlySavings), vec!["-4\u{202f}900\u{a0}€"]);
    }

    #[test]
    fn test_dropped_calculator_unsubscribes() {
        let document = document_with_outputs();
        let page = PageState::new();
        let calculator = RoiCalculator::setup(&document, &page, CalculatorConfig::default());
        assert_eq!(page.bus.subscriber_count(), 1);

        drop(calculator);
        assert_eq!(page.bus.subscriber_count(), 0);
        page.bus.publish("sku-count", 1.0);
    }
}
