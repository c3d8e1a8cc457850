//! Wizard Registry - static step definitions.
//!
//! Each wizard kind owns an ordered, immutable list of steps. A step may carry
//! a conditional predicate over the values collected so far; the engine skips
//! steps whose predicate is false.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::{Collected, FieldValue};

/// Marketplace gig categories, in display order.
pub const GIG_CATEGORIES: &[&str] = &[
    "Web Development",
    "Mobile Development",
    "UI/UX Design",
    "Graphic Design",
    "Content Writing",
    "Video Editing",
    "Social Media",
    "Data Entry",
    "Virtual Assistant",
    "Translation",
    "Tutoring",
    "Photography",
    "Music & Audio",
    "Marketing",
    "Delivery",
    "Other",
];

/// Category choice meaning "no category filter" in the search wizard.
pub const ANY_CATEGORY: &str = "Any category";

const SEARCH_CATEGORIES: &[&str] = &[
    ANY_CATEGORY,
    "Web Development",
    "Mobile Development",
    "UI/UX Design",
    "Graphic Design",
    "Content Writing",
    "Video Editing",
    "Social Media",
    "Data Entry",
    "Virtual Assistant",
    "Translation",
    "Tutoring",
    "Photography",
    "Music & Audio",
    "Marketing",
    "Delivery",
    "Other",
];

const YES_NO: &[&str] = &["Yes", "No"];

const AVAILABILITY: &[&str] = &["Full-time", "Part-time", "Weekends", "Flexible"];

/// The guided flows the assistant can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardKind {
    PostGig,
    RegisterFreelancer,
    FindGigs,
}

impl WizardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardKind::PostGig => "post_gig",
            WizardKind::RegisterFreelancer => "register_freelancer",
            WizardKind::FindGigs => "find_gigs",
        }
    }
}

impl fmt::Display for WizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which input control the host should render for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    Text,
    Textarea,
    Number,
    Date,
    SingleSelect,
    MultiSelect,
}

impl InputType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, InputType::Number)
    }
}

/// Predicate deciding whether a step applies given prior answers.
pub type StepCondition = fn(&Collected) -> bool;

/// Static definition of one wizard step.
#[derive(Clone, Copy)]
pub struct StepDefinition {
    pub key: &'static str,
    pub prompt: &'static str,
    pub input_type: InputType,
    pub options: &'static [&'static str],
    pub placeholder: Option<&'static str>,
    pub conditional: Option<StepCondition>,
    pub optional: bool,
    /// Answer is a "Yes"/"No" toggle stored as a boolean.
    pub yes_no: bool,
    /// Numeric answer is stored as a whole number.
    pub integer: bool,
}

impl StepDefinition {
    const fn new(key: &'static str, prompt: &'static str, input_type: InputType) -> Self {
        Self {
            key,
            prompt,
            input_type,
            options: &[],
            placeholder: None,
            conditional: None,
            optional: false,
            yes_no: false,
            integer: false,
        }
    }

    const fn with_options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    const fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    const fn when(mut self, condition: StepCondition) -> Self {
        self.conditional = Some(condition);
        self
    }

    const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    const fn yes_no(mut self) -> Self {
        self.options = YES_NO;
        self.yes_no = true;
        self
    }

    const fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Whether this step applies given the current answers.
    pub fn applies(&self, collected: &Collected) -> bool {
        match self.conditional {
            None => true,
            Some(condition) => condition(collected),
        }
    }

    /// Host-facing description of the input control.
    pub fn input_spec(&self) -> StepInputSpec {
        StepInputSpec {
            key: self.key.to_string(),
            input_type: self.input_type,
            options: self.options.iter().map(|o| o.to_string()).collect(),
            placeholder: self.placeholder.map(str::to_string),
            optional: self.optional,
        }
    }
}

impl PartialEq for StepDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.prompt == other.prompt
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("key", &self.key)
            .field("input_type", &self.input_type)
            .field("conditional", &self.conditional.is_some())
            .field("optional", &self.optional)
            .finish()
    }
}

/// Input configuration attached to a prompt message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInputSpec {
    pub key: String,
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

fn category_is_other(collected: &Collected) -> bool {
    matches!(collected.get("category"), Some(FieldValue::Text(c)) if c == "Other")
}

static POST_GIG_STEPS: [StepDefinition; 11] = [
    StepDefinition::new(
        "title",
        "Great! Let's post a gig. What's the title of your gig?",
        InputType::Text,
    )
    .with_placeholder("e.g. Build a landing page for my bakery"),
    StepDefinition::new(
        "description",
        "Got it! Describe the work that needs to be done.",
        InputType::Textarea,
    )
    .with_placeholder("Deliverables, skills, anything a freelancer should know"),
    StepDefinition::new(
        "category",
        "Awesome! Which category fits best?",
        InputType::SingleSelect,
    )
    .with_options(GIG_CATEGORIES),
    StepDefinition::new(
        "custom_category",
        "No worries! What should we call this category?",
        InputType::Text,
    )
    .with_placeholder("e.g. Event Staffing")
    .when(category_is_other),
    StepDefinition::new(
        "location",
        "Where is the gig located? A city, or Remote.",
        InputType::Text,
    )
    .with_placeholder("e.g. Remote"),
    StepDefinition::new(
        "budget_min",
        "What's the minimum budget in USD?",
        InputType::Number,
    )
    .with_placeholder("50"),
    StepDefinition::new(
        "budget_max",
        "And what's the maximum budget in USD?",
        InputType::Number,
    )
    .with_placeholder("200"),
    StepDefinition::new(
        "duration_start",
        "When should the gig start?",
        InputType::Date,
    )
    .with_placeholder("YYYY-MM-DD"),
    StepDefinition::new("duration_end", "When should it wrap up?", InputType::Date)
        .with_placeholder("YYYY-MM-DD"),
    StepDefinition::new(
        "people_needed",
        "How many people do you need?",
        InputType::Number,
    )
    .with_placeholder("1")
    .integer(),
    StepDefinition::new(
        "is_urgent",
        "Last one! Is this gig urgent?",
        InputType::SingleSelect,
    )
    .yes_no(),
];

static REGISTER_FREELANCER_STEPS: [StepDefinition; 5] = [
    StepDefinition::new(
        "categories",
        "Awesome! Let's set up your freelancer profile. Which categories do you work in? Pick all that apply, then hit done.",
        InputType::MultiSelect,
    )
    .with_options(GIG_CATEGORIES),
    StepDefinition::new(
        "availability",
        "Got it! What's your availability?",
        InputType::SingleSelect,
    )
    .with_options(AVAILABILITY),
    StepDefinition::new("location", "Where are you based?", InputType::Text)
        .with_placeholder("e.g. Austin, TX"),
    StepDefinition::new(
        "bio",
        "Tell clients a bit about yourself.",
        InputType::Textarea,
    )
    .with_placeholder("Experience, tools, what you love working on"),
    StepDefinition::new(
        "hourly_rate",
        "What's your hourly rate in USD? Leave it blank to skip.",
        InputType::Number,
    )
    .with_placeholder("25")
    .optional(),
];

static FIND_GIGS_STEPS: [StepDefinition; 3] = [
    StepDefinition::new(
        "category",
        "Let's find you some work! Which category are you after?",
        InputType::SingleSelect,
    )
    .with_options(SEARCH_CATEGORIES),
    StepDefinition::new(
        "location",
        "Any preferred location? Leave it blank for anywhere.",
        InputType::Text,
    )
    .with_placeholder("e.g. Remote")
    .optional(),
    StepDefinition::new(
        "urgent_only",
        "Only show urgent gigs?",
        InputType::SingleSelect,
    )
    .yes_no(),
];

/// Ordered step list for a wizard kind.
pub fn steps_for(kind: WizardKind) -> &'static [StepDefinition] {
    match kind {
        WizardKind::PostGig => &POST_GIG_STEPS,
        WizardKind::RegisterFreelancer => &REGISTER_FREELANCER_STEPS,
        WizardKind::FindGigs => &FIND_GIGS_STEPS,
    }
}
