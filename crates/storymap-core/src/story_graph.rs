//! The story graph domain model.
//!
//! A story graph is the hierarchical product backlog this crate renders:
//! epics contain sub-epics (which may nest), sub-epics contain story groups,
//! and story groups contain stories. Increments group stories by name across
//! the hierarchy.
//!
//! The model is read-only input for the diagram subsystem. It is produced by
//! an external tool as JSON:
//!
//! ```json
//! {
//!   "epics": [{
//!     "name": "Checkout",
//!     "sequential_order": 1,
//!     "sub_epics": [{
//!       "name": "Pay",
//!       "story_groups": [{ "stories": [
//!         { "name": "Enter Card", "story_type": "user", "users": ["Shopper"] }
//!       ]}]
//!     }]
//!   }],
//!   "increments": [{ "name": "MVP", "priority": 1, "stories": ["Enter Card"] }]
//! }
//! ```
//!
//! Missing `sequential_order` values are filled with the 1-based position of
//! the node among its siblings when the graph is constructed.

use std::{cmp::Ordering, fmt, fs, io, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a story graph.
#[derive(Debug, Error)]
pub enum StoryGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid story graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The tier a story graph node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryNodeType {
    Epic,
    SubEpic,
    Story,
}

impl StoryNodeType {
    /// Returns the snake_case name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::SubEpic => "sub_epic",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for StoryNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common read access shared by every node of the story graph.
pub trait StoryNode {
    /// Display name of the node.
    fn name(&self) -> &str;

    /// Position of the node among its siblings.
    fn sequential_order(&self) -> f64;

    /// Tier of the node.
    fn node_type(&self) -> StoryNodeType;
}

/// The kind of work a story describes. Drives its fill colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoryType {
    #[default]
    User,
    System,
    Technical,
}

impl StoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Technical => "technical",
        }
    }
}

impl From<String> for StoryType {
    /// Unknown values fall back to [`StoryType::User`].
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" => Self::System,
            "technical" => Self::Technical,
            _ => Self::User,
        }
    }
}

impl From<StoryType> for String {
    fn from(value: StoryType) -> Self {
        value.as_str().to_string()
    }
}

/// A single acceptance criterion of a story.
///
/// Accepts either a bare string or an object carrying the text under
/// `description`, `text` or `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CriterionRepr", into = "String")]
pub struct AcceptanceCriterion {
    text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CriterionRepr {
    Text(String),
    Detailed {
        #[serde(alias = "text", alias = "name")]
        description: String,
    },
}

impl From<CriterionRepr> for AcceptanceCriterion {
    fn from(repr: CriterionRepr) -> Self {
        match repr {
            CriterionRepr::Text(text) => Self { text },
            CriterionRepr::Detailed { description } => Self { text: description },
        }
    }
}

impl From<AcceptanceCriterion> for String {
    fn from(value: AcceptanceCriterion) -> Self {
        value.text
    }
}

impl AcceptanceCriterion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A leaf of the story graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    name: String,
    #[serde(default)]
    sequential_order: Option<f64>,
    #[serde(default)]
    story_type: StoryType,
    #[serde(default)]
    acceptance_criteria: Vec<AcceptanceCriterion>,
    #[serde(default)]
    users: Vec<String>,
}

impl Story {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequential_order: None,
            story_type: StoryType::default(),
            acceptance_criteria: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.sequential_order = Some(order);
        self
    }

    pub fn with_type(mut self, story_type: StoryType) -> Self {
        self.story_type = story_type;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.users.push(user.into());
        self
    }

    pub fn with_criterion(mut self, text: impl Into<String>) -> Self {
        self.acceptance_criteria.push(AcceptanceCriterion::new(text));
        self
    }

    pub fn story_type(&self) -> StoryType {
        self.story_type
    }

    pub fn acceptance_criteria(&self) -> &[AcceptanceCriterion] {
        &self.acceptance_criteria
    }

    /// Names of the actors that perform this story.
    pub fn users(&self) -> &[String] {
        &self.users
    }
}

impl StoryNode for Story {
    fn name(&self) -> &str {
        &self.name
    }

    fn sequential_order(&self) -> f64 {
        self.sequential_order.unwrap_or_default()
    }

    fn node_type(&self) -> StoryNodeType {
        StoryNodeType::Story
    }
}

/// An ordered group of stories inside a sub-epic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryGroup {
    #[serde(default)]
    stories: Vec<Story>,
}

impl StoryGroup {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }
}

/// A sub-epic: either a container of nested sub-epics or a leaf holding stories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEpic {
    name: String,
    #[serde(default)]
    sequential_order: Option<f64>,
    #[serde(default)]
    sub_epics: Vec<SubEpic>,
    #[serde(default)]
    story_groups: Vec<StoryGroup>,
}

impl SubEpic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequential_order: None,
            sub_epics: Vec::new(),
            story_groups: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.sequential_order = Some(order);
        self
    }

    pub fn with_sub_epic(mut self, sub_epic: SubEpic) -> Self {
        self.sub_epics.push(sub_epic);
        self
    }

    /// Appends a story to the last story group, creating one if needed.
    pub fn with_story(mut self, story: Story) -> Self {
        match self.story_groups.last_mut() {
            Some(group) => group.stories.push(story),
            None => self.story_groups.push(StoryGroup::new(vec![story])),
        }
        self
    }

    pub fn sub_epics(&self) -> &[SubEpic] {
        &self.sub_epics
    }

    pub fn story_groups(&self) -> &[StoryGroup] {
        &self.story_groups
    }

    /// Iterates the stories of every group in order.
    pub fn stories(&self) -> impl Iterator<Item = &Story> {
        self.story_groups.iter().flat_map(|group| group.stories.iter())
    }

    /// A leaf sub-epic has no nested sub-epics.
    pub fn is_leaf(&self) -> bool {
        self.sub_epics.is_empty()
    }

    /// Number of sub-epic levels rooted at this node, itself included.
    pub fn depth(&self) -> usize {
        1 + self.sub_epics.iter().map(SubEpic::depth).max().unwrap_or(0)
    }

    fn assign_missing_orders(&mut self) {
        assign_orders(&mut self.sub_epics, |s| &mut s.sequential_order);
        let mut index = 0;
        for group in &mut self.story_groups {
            for story in &mut group.stories {
                index += 1;
                if story.sequential_order.is_none() {
                    story.sequential_order = Some(index as f64);
                }
            }
        }
        for sub_epic in &mut self.sub_epics {
            sub_epic.assign_missing_orders();
        }
    }
}

impl StoryNode for SubEpic {
    fn name(&self) -> &str {
        &self.name
    }

    fn sequential_order(&self) -> f64 {
        self.sequential_order.unwrap_or_default()
    }

    fn node_type(&self) -> StoryNodeType {
        StoryNodeType::SubEpic
    }
}

/// A top-level epic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epic {
    name: String,
    #[serde(default)]
    sequential_order: Option<f64>,
    #[serde(default)]
    sub_epics: Vec<SubEpic>,
}

impl Epic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequential_order: None,
            sub_epics: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.sequential_order = Some(order);
        self
    }

    pub fn with_sub_epic(mut self, sub_epic: SubEpic) -> Self {
        self.sub_epics.push(sub_epic);
        self
    }

    pub fn sub_epics(&self) -> &[SubEpic] {
        &self.sub_epics
    }

    /// Deepest nesting of sub-epics below this epic; `0` when it has none.
    pub fn sub_epic_depth(&self) -> usize {
        self.sub_epics.iter().map(SubEpic::depth).max().unwrap_or(0)
    }

    fn assign_missing_orders(&mut self) {
        assign_orders(&mut self.sub_epics, |s| &mut s.sequential_order);
        for sub_epic in &mut self.sub_epics {
            sub_epic.assign_missing_orders();
        }
    }
}

impl StoryNode for Epic {
    fn name(&self) -> &str {
        &self.name
    }

    fn sequential_order(&self) -> f64 {
        self.sequential_order.unwrap_or_default()
    }

    fn node_type(&self) -> StoryNodeType {
        StoryNodeType::Epic
    }
}

/// Delivery priority of an increment. Either a rank or a free-form label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Priority {
    Rank(i64),
    Label(String),
}

impl Default for Priority {
    fn default() -> Self {
        Self::Rank(i64::MAX)
    }
}

impl Ord for Priority {
    /// Numeric ranks come first in ascending order, then labels lexicographically.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Rank(a), Self::Rank(b)) => a.cmp(b),
            (Self::Rank(_), Self::Label(_)) => Ordering::Less,
            (Self::Label(_), Self::Rank(_)) => Ordering::Greater,
            (Self::Label(a), Self::Label(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A delivery increment: a named, prioritised selection of stories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Increment {
    name: String,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    stories: Vec<String>,
}

impl Increment {
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            name: name.into(),
            priority,
            stories: Vec::new(),
        }
    }

    pub fn with_story(mut self, story_name: impl Into<String>) -> Self {
        self.stories.push(story_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> &Priority {
        &self.priority
    }

    /// Names of the stories delivered in this increment.
    pub fn stories(&self) -> &[String] {
        &self.stories
    }

    pub fn contains_story(&self, story_name: &str) -> bool {
        self.stories.iter().any(|name| name == story_name)
    }
}

/// The root of a story graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryGraph {
    #[serde(default)]
    epics: Vec<Epic>,
    #[serde(default)]
    increments: Vec<Increment>,
}

impl StoryGraph {
    /// Creates a graph, filling in missing sequential orders.
    pub fn new(epics: Vec<Epic>, increments: Vec<Increment>) -> Self {
        let mut graph = Self { epics, increments };
        graph.assign_missing_orders();
        graph
    }

    /// Parses a story graph from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`StoryGraphError::Json`] if the input is not a valid story graph.
    pub fn from_json_str(json: &str) -> Result<Self, StoryGraphError> {
        let mut graph: StoryGraph = serde_json::from_str(json)?;
        graph.assign_missing_orders();
        Ok(graph)
    }

    /// Reads and parses a story graph JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`StoryGraphError::Io`] if the file cannot be read and
    /// [`StoryGraphError::Json`] if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoryGraphError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let graph = Self::from_json_str(&content)?;
        debug!(path:? = path, nodes = graph.node_count(); "Story graph loaded");
        Ok(graph)
    }

    pub fn epics(&self) -> &[Epic] {
        &self.epics
    }

    pub fn increments(&self) -> &[Increment] {
        &self.increments
    }

    /// Deepest sub-epic nesting across every epic.
    pub fn max_sub_epic_depth(&self) -> usize {
        self.epics
            .iter()
            .map(Epic::sub_epic_depth)
            .max()
            .unwrap_or(0)
    }

    /// Iterates every story in tree order.
    pub fn all_stories(&self) -> Vec<&Story> {
        fn collect<'a>(sub_epic: &'a SubEpic, out: &mut Vec<&'a Story>) {
            for child in sub_epic.sub_epics() {
                collect(child, out);
            }
            out.extend(sub_epic.stories());
        }

        let mut stories = Vec::new();
        for epic in &self.epics {
            for sub_epic in epic.sub_epics() {
                collect(sub_epic, &mut stories);
            }
        }
        stories
    }

    /// Finds the first story with the given name in tree order.
    pub fn find_story(&self, name: &str) -> Option<&Story> {
        self.all_stories().into_iter().find(|story| story.name() == name)
    }

    /// Total number of epics, sub-epics and stories.
    pub fn node_count(&self) -> usize {
        fn count(sub_epic: &SubEpic) -> usize {
            1 + sub_epic.stories().count() + sub_epic.sub_epics().iter().map(count).sum::<usize>()
        }

        self.epics
            .iter()
            .map(|epic| 1 + epic.sub_epics().iter().map(count).sum::<usize>())
            .sum()
    }

    fn assign_missing_orders(&mut self) {
        assign_orders(&mut self.epics, |e| &mut e.sequential_order);
        for epic in &mut self.epics {
            epic.assign_missing_orders();
        }
    }
}

fn assign_orders<T>(nodes: &mut [T], order: impl Fn(&mut T) -> &mut Option<f64>) {
    for (index, node) in nodes.iter_mut().enumerate() {
        let slot = order(node);
        if slot.is_none() {
            *slot = Some((index + 1) as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKOUT_JSON: &str = r#"{
        "epics": [{
            "name": "Checkout",
            "sub_epics": [{
                "name": "Pay",
                "story_groups": [{"stories": [
                    {"name": "Enter Card", "users": ["Shopper"],
                     "acceptance_criteria": ["Card number is masked", {"description": "Expiry validated"}]},
                    {"name": "Confirm", "story_type": "system", "sequential_order": 7}
                ]}]
            }]
        }],
        "increments": [{"name": "MVP", "priority": 1, "stories": ["Enter Card"]}]
    }"#;

    #[test]
    fn test_parse_story_graph() {
        let graph = StoryGraph::from_json_str(CHECKOUT_JSON).unwrap();

        assert_eq!(graph.epics().len(), 1);
        let epic = &graph.epics()[0];
        assert_eq!(epic.name(), "Checkout");
        assert_eq!(epic.sequential_order(), 1.0);

        let pay = &epic.sub_epics()[0];
        let stories: Vec<_> = pay.stories().collect();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].users(), ["Shopper"]);
        assert_eq!(stories[0].story_type(), StoryType::User);
        assert_eq!(stories[1].story_type(), StoryType::System);
    }

    #[test]
    fn test_missing_orders_filled_from_position() {
        let graph = StoryGraph::from_json_str(CHECKOUT_JSON).unwrap();
        let stories = graph.all_stories();

        assert_eq!(stories[0].sequential_order(), 1.0);
        assert_eq!(stories[1].sequential_order(), 7.0);
    }

    #[test]
    fn test_acceptance_criteria_shapes() {
        let graph = StoryGraph::from_json_str(CHECKOUT_JSON).unwrap();
        let story = graph.find_story("Enter Card").unwrap();
        let texts: Vec<_> = story.acceptance_criteria().iter().map(|ac| ac.text()).collect();

        assert_eq!(texts, ["Card number is masked", "Expiry validated"]);
    }

    #[test]
    fn test_unknown_story_type_defaults_to_user() {
        let story: Story = serde_json::from_str(r#"{"name": "X", "story_type": "epic"}"#).unwrap();
        assert_eq!(story.story_type(), StoryType::User);
    }

    #[test]
    fn test_priority_ordering() {
        let mut priorities = vec![
            Priority::Label("later".to_string()),
            Priority::Rank(2),
            Priority::Label("asap".to_string()),
            Priority::Rank(1),
        ];
        priorities.sort();

        assert_eq!(
            priorities,
            vec![
                Priority::Rank(1),
                Priority::Rank(2),
                Priority::Label("asap".to_string()),
                Priority::Label("later".to_string()),
            ]
        );
    }

    #[test]
    fn test_priority_accepts_string_or_number() {
        let increments: Vec<Increment> =
            serde_json::from_str(r#"[{"name": "A", "priority": 3}, {"name": "B", "priority": "high"}]"#)
                .unwrap();

        assert_eq!(increments[0].priority(), &Priority::Rank(3));
        assert_eq!(increments[1].priority(), &Priority::Label("high".to_string()));
    }

    #[test]
    fn test_depth_and_node_count() {
        let graph = StoryGraph::new(
            vec![
                Epic::new("E1").with_sub_epic(
                    SubEpic::new("Outer")
                        .with_sub_epic(SubEpic::new("Inner").with_story(Story::new("S1"))),
                ),
                Epic::new("E2"),
            ],
            Vec::new(),
        );

        assert_eq!(graph.max_sub_epic_depth(), 2);
        assert_eq!(graph.epics()[1].sub_epic_depth(), 0);
        // 2 epics + 2 sub-epics + 1 story
        assert_eq!(graph.node_count(), 5);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let result = StoryGraph::from_json_str("{ not json");
        assert!(matches!(result, Err(StoryGraphError::Json(_))));
    }

    #[test]
    fn test_builder_assigns_orders() {
        let graph = StoryGraph::new(
            vec![Epic::new("A"), Epic::new("B").with_order(10.0)],
            Vec::new(),
        );

        assert_eq!(graph.epics()[0].sequential_order(), 1.0);
        assert_eq!(graph.epics()[1].sequential_order(), 10.0);
    }
}
