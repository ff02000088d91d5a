use crate::error::EditError;
use crate::model::{Flow, FlowStatus};
use crate::storage::PublishedFlow;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Dashboard tab filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(FlowStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: FlowStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// All flows known to the editor, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowLibrary {
    flows: Vec<Flow>,
}

impl FlowLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flows(flows: Vec<Flow>) -> Self {
        Self { flows }
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Flow, EditError> {
        self.flows
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| EditError::FlowNotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Flow, EditError> {
        self.flows
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| EditError::FlowNotFound(id.to_string()))
    }

    /// Flows for a dashboard tab, narrowed by a case-insensitive search on
    /// name and id, highest priority first (ties broken by name, ignoring case).
    pub fn list(&self, filter: StatusFilter, query: &str) -> Vec<&Flow> {
        let needle = query.trim().to_lowercase();
        let mut flows: Vec<&Flow> = self
            .flows
            .iter()
            .filter(|f| filter.matches(f.status))
            .filter(|f| {
                needle.is_empty()
                    || f.name.to_lowercase().contains(&needle)
                    || f.id.to_lowercase().contains(&needle)
            })
            .collect();
        flows.sort_by(|a, b| {
            Reverse(a.priority)
                .cmp(&Reverse(b.priority))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        flows
    }

    /// Creates an empty draft flow and returns it for editing.
    pub fn create(&mut self, name: &str) -> Result<&mut Flow, EditError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyName);
        }
        let id = self.unique_id(&slugify(name));
        let mut flow = Flow::new(&id, name);
        flow.legacy = self.next_legacy_id()?;
        log::info!("Created flow '{}' (#{})", flow.id, flow.legacy);
        Ok(self.push(flow))
    }

    /// Copies a flow as a new draft.
    pub fn duplicate(&mut self, id: &str) -> Result<&mut Flow, EditError> {
        let source = self.get(id)?;
        let mut copy = source.clone();
        copy.id = self.unique_id(&format!("{}_copy", source.id));
        copy.name = format!("{} (Copy)", source.name);
        copy.status = FlowStatus::Draft;
        copy.legacy = self.next_legacy_id()?;
        copy.touch();
        copy.step_count = source.step_count();
        log::info!("Duplicated flow '{}' as '{}'", id, copy.id);
        Ok(self.push(copy))
    }

    pub fn remove(&mut self, id: &str) -> Result<Flow, EditError> {
        let index = self
            .flows
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| EditError::FlowNotFound(id.to_string()))?;
        log::info!("Removed flow '{}'", id);
        Ok(self.flows.remove(index))
    }

    /// Switches an active flow off or an inactive flow on. Drafts only go
    /// live through [`FlowLibrary::publish`].
    pub fn toggle_status(&mut self, id: &str) -> Result<FlowStatus, EditError> {
        let flow = self.get_mut(id)?;
        flow.status = match flow.status {
            FlowStatus::Active => FlowStatus::Inactive,
            FlowStatus::Inactive => FlowStatus::Active,
            FlowStatus::Draft => {
                return Err(EditError::InvalidStatusTransition {
                    flow_id: id.to_string(),
                    status: FlowStatus::Draft.to_string(),
                });
            }
        };
        flow.touch();
        log::info!("Flow '{}' is now {}", id, flow.status);
        Ok(flow.status)
    }

    /// Validates the flow and, when it has no errors, marks it active and
    /// returns the bundle the game client consumes.
    pub fn publish(&mut self, id: &str) -> Result<PublishedFlow, EditError> {
        let flow = self.get_mut(id)?;
        let report = validation::validate(flow);
        if !report.is_valid() {
            log::warn!(
                "Refusing to publish '{}': {} error(s)",
                id,
                report.error_count()
            );
            return Err(EditError::ValidationFailed {
                flow_id: id.to_string(),
                report,
            });
        }
        let published = PublishedFlow::compile(flow)?;
        flow.status = FlowStatus::Active;
        flow.touch();
        log::info!("Published flow '{}' with {} step(s)", id, published.steps.len());
        Ok(published)
    }

    fn push(&mut self, flow: Flow) -> &mut Flow {
        self.flows.push(flow);
        let last = self.flows.len() - 1;
        &mut self.flows[last]
    }

    fn next_legacy_id(&self) -> Result<u32, EditError> {
        match self.flows.iter().map(|f| f.legacy).max() {
            Some(highest) => highest
                .checked_add(1)
                .ok_or(EditError::LegacyNumberExhausted(highest)),
            None => Ok(1),
        }
    }

    fn unique_id(&self, base: &str) -> String {
        let taken = |id: &str| self.flows.iter().any(|f| f.id == id);
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}_{}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

/// Lowercase, underscore-separated id from a display name.
pub fn slugify(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        "flow".to_string()
    } else {
        slug
    }
}
