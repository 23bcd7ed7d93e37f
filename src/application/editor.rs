//! Conditions editor: owns catalog, seed data, live tree and event bus.
//!
//! Every user interaction mutates the owned live tree and emits exactly one
//! `update` event.

use generational_arena::Index;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::events::{ChangeCause, EditorEvent, EventBus, SubscriptionId, Topic};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::EditorSettings;
use crate::domain::{
    collector, CombinatorKind, DomainError, FieldCatalog, FieldDef, LiveTree, Node, NodePath, TreeBuilder,
};

/// Construction options for [`ConditionsEditor`].
#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    pub fields: Vec<FieldDef>,
    /// Seed tree, `{<default kind>: []}` when absent
    pub data: Option<Node>,
}

#[derive(Debug)]
pub struct ConditionsEditor {
    catalog: FieldCatalog,
    data: Node,
    live: Option<LiveTree>,
    events: EventBus,
    settings: EditorSettings,
}

impl ConditionsEditor {
    pub fn initialize(options: EditorOptions) -> Self {
        Self::with_settings(options, &EditorSettings::default())
    }

    pub fn with_settings(options: EditorOptions, settings: &EditorSettings) -> Self {
        let data = options
            .data
            .unwrap_or_else(|| Node::conditional(settings.default_kind, Vec::new()));
        Self {
            catalog: FieldCatalog::new(options.fields),
            data,
            live: None,
            events: EventBus::new(),
            settings: settings.clone(),
        }
    }

    pub fn set_fields(&mut self, fields: Vec<FieldDef>) {
        self.catalog = FieldCatalog::new(fields);
    }

    pub fn set_data(&mut self, data: Node) {
        self.data = data;
    }

    pub fn fields(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn data(&self) -> &Node {
        &self.data
    }

    pub fn live(&self) -> Option<&LiveTree> {
        self.live.as_ref()
    }

    /// Build the live tree from the current data, replacing any previous one.
    ///
    /// Emits `update` with [`ChangeCause::RenderComplete`] once the tree is fully built.
    #[instrument(level = "debug", skip(self))]
    pub fn render(&mut self) -> ApplicationResult<&LiveTree> {
        let tree = TreeBuilder::new(&self.catalog).build(&self.data)?;
        self.live = Some(tree);
        if self.settings.emit_render_update {
            self.emit(ChangeCause::RenderComplete);
        }
        self.live.as_ref().ok_or(ApplicationError::NotRendered)
    }

    /// Read a live tree back into its declarative form.
    pub fn collect(&self, tree: &LiveTree) -> ApplicationResult<Node> {
        Ok(collector::collect(tree)?)
    }

    /// Collect the editor's own live tree.
    pub fn snapshot(&self) -> ApplicationResult<Node> {
        self.collect(self.live.as_ref().ok_or(ApplicationError::NotRendered)?)
    }

    pub fn subscribe(&mut self, topic: Topic, handler: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(topic, handler)
    }

    pub fn unsubscribe(&mut self, topic: Topic, id: SubscriptionId) -> bool {
        self.events.unsubscribe(topic, id)
    }

    pub fn resolve(&self, path: &NodePath) -> ApplicationResult<Index> {
        let live = self.live.as_ref().ok_or(ApplicationError::NotRendered)?;
        Ok(live.resolve(path)?)
    }

    /// "Add Condition": append a default rule to the conditional `at`.
    #[instrument(level = "debug", skip(self))]
    pub fn add_condition(&mut self, at: Index) -> ApplicationResult<Index> {
        let builder = TreeBuilder::new(&self.catalog);
        let live = self.live.as_mut().ok_or(ApplicationError::NotRendered)?;
        live.conditional(at)?;
        let rule = Node::Rule(builder.default_rule()?);
        let idx = builder.build_into(live, &rule, Some(at))?;
        self.emit(ChangeCause::ConditionAdded);
        Ok(idx)
    }

    /// "Add Sub-Condition": append `all` wrapping one default rule.
    #[instrument(level = "debug", skip(self))]
    pub fn add_sub_condition(&mut self, at: Index) -> ApplicationResult<Index> {
        let builder = TreeBuilder::new(&self.catalog);
        let live = self.live.as_mut().ok_or(ApplicationError::NotRendered)?;
        live.conditional(at)?;
        let sub = builder.default_sub_condition()?;
        let idx = builder.build_into(live, &sub, Some(at))?;
        self.emit(ChangeCause::SubConditionAdded);
        Ok(idx)
    }

    /// "Remove" / "Remove This Sub-Condition": detach the node and its subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, node: Index) -> ApplicationResult<()> {
        let live = self.live.as_mut().ok_or(ApplicationError::NotRendered)?;
        live.detach(node)?;
        self.emit(ChangeCause::NodeRemoved);
        Ok(())
    }

    pub fn change_kind(&mut self, at: Index, kind: CombinatorKind) -> ApplicationResult<()> {
        let live = self.live.as_mut().ok_or(ApplicationError::NotRendered)?;
        live.conditional_mut(at)?.set_kind(kind);
        self.emit(ChangeCause::KindChanged);
        Ok(())
    }

    /// Select another field; operators repopulate with the first one selected.
    #[instrument(level = "debug", skip(self))]
    pub fn change_field(&mut self, rule: Index, field: &str) -> ApplicationResult<()> {
        if self.catalog.field(field).is_none() {
            return Err(DomainError::UnknownField(field.to_string()).into());
        }
        let builder = TreeBuilder::new(&self.catalog);
        let live = self.live.as_mut().ok_or(ApplicationError::NotRendered)?;
        builder.select_field(live.rule_mut(rule)?, field)?;
        self.emit(ChangeCause::FieldChanged);
        Ok(())
    }

    /// Select another operator; value controls regenerate.
    #[instrument(level = "debug", skip(self))]
    pub fn change_operator(&mut self, rule: Index, operator: &str) -> ApplicationResult<()> {
        let builder = TreeBuilder::new(&self.catalog);
        let live = self.live.as_mut().ok_or(ApplicationError::NotRendered)?;
        let live_rule = live.rule_mut(rule)?;
        let field = live_rule.field_name().to_string();
        let known = self
            .catalog
            .field(&field)
            .and_then(|f| f.operator(operator))
            .is_some();
        if !known {
            return Err(DomainError::UnknownOperator {
                field,
                operator: operator.to_string(),
            }
            .into());
        }
        builder.select_operator(live_rule, operator)?;
        self.emit(ChangeCause::OperatorChanged);
        Ok(())
    }

    /// Set the authoritative (last) value control.
    ///
    /// A choice always has a selection, so `null` is rejected for it.
    pub fn change_value(&mut self, rule: Index, value: Value) -> ApplicationResult<()> {
        let live = self.live.as_mut().ok_or(ApplicationError::NotRendered)?;
        let live_rule = live.rule_mut(rule)?;
        let field = live_rule.field_name().to_string();
        let last = live_rule
            .values
            .last_mut()
            .ok_or_else(|| DomainError::MissingValue { field: field.clone() })?;
        if value.is_null() && last.as_choice().is_some() {
            return Err(DomainError::ClearedChoice { field }.into());
        }
        last.set_value(value);
        self.emit(ChangeCause::ValueChanged);
        Ok(())
    }

    /// Switch a select rule between `static` and `field` (or a plain option).
    #[instrument(level = "debug", skip(self))]
    pub fn change_value_source(&mut self, rule: Index, source: &str) -> ApplicationResult<()> {
        let builder = TreeBuilder::new(&self.catalog);
        let live = self.live.as_mut().ok_or(ApplicationError::NotRendered)?;
        let live_rule = live.rule_mut(rule)?;
        builder.dispatcher().redispatch_source(live_rule, source)?;
        self.emit(ChangeCause::ValueSourceChanged);
        Ok(())
    }

    fn emit(&mut self, cause: ChangeCause) {
        debug!(?cause, "tree updated");
        self.events.emit(&EditorEvent::update(cause));
    }
}
