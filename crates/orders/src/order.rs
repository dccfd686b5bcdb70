use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockflow_core::{Aggregate, AggregateRoot, DomainError, OrderId};
use stockflow_events::Event;
use stockflow_inventory::RequirementVector;

use crate::line::{ConsumingLine, PackLine, ServiceLine};
use crate::status::OrderStatus;
use crate::transition::{TransitionAction, plan_transition};

/// Counter order: lines are units of services.
pub type ServiceOrder = Order<ServiceLine>;

/// Storefront order: lines are packs.
pub type ClientOrder = Order<PackLine>;

/// Aggregate root: Order.
///
/// `consumption` is the requirement vector that was subtracted from stock when
/// the order entered the consuming region. It is what gets restored, even if
/// the lines were edited in between. Outside the consuming region it is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: ConsumingLine"))]
pub struct Order<L> {
    id: OrderId,
    lines: Vec<L>,
    status: OrderStatus,
    consumption: Option<RequirementVector>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
    deleted: bool,
}

impl<L: ConsumingLine> Order<L> {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: OrderId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            status: OrderStatus::Pending,
            consumption: None,
            created_at: None,
            updated_at: None,
            version: 0,
            created: false,
            deleted: false,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn lines(&self) -> &[L] {
        &self.lines
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Consumption currently reflected in stock for this order.
    pub fn consumption(&self) -> Option<&RequirementVector> {
        self.consumption.as_ref()
    }

    pub fn is_consuming(&self) -> bool {
        self.status.is_consuming()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Stock action a move to `status` would cause from the current state.
    pub fn plan_status_change(&self, status: OrderStatus) -> TransitionAction {
        plan_transition(Some(self.status), Some(status))
    }
}

impl<L: ConsumingLine> AggregateRoot for Order<L> {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateOrder.
///
/// `consumption` is the vector computed from `lines`; it is required when
/// `status` is consuming and ignored otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: ConsumingLine"))]
pub struct CreateOrder<L> {
    pub order_id: OrderId,
    pub lines: Vec<L>,
    pub status: OrderStatus,
    pub consumption: Option<RequirementVector>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ChangeStatus.
///
/// `consumption` is the vector computed from the order's current lines; it is
/// required when the target status is consuming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStatus {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub consumption: Option<RequirementVector>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReplaceLines. Does not move stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: ConsumingLine"))]
pub struct ReplaceLines<L> {
    pub order_id: OrderId,
    pub lines: Vec<L>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOrder {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: ConsumingLine"))]
pub enum OrderCommand<L> {
    CreateOrder(CreateOrder<L>),
    ChangeStatus(ChangeStatus),
    ReplaceLines(ReplaceLines<L>),
    DeleteOrder(DeleteOrder),
}

/// Event: OrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: ConsumingLine"))]
pub struct OrderCreated<L> {
    pub order_id: OrderId,
    pub lines: Vec<L>,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderLinesReplaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: ConsumingLine"))]
pub struct OrderLinesReplaced<L> {
    pub order_id: OrderId,
    pub lines: Vec<L>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ConsumptionAttached. Stock must be reduced by `consumption`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionAttached {
    pub order_id: OrderId,
    pub consumption: RequirementVector,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ConsumptionReleased. Stock must be given back `consumption`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionReleased {
    pub order_id: OrderId,
    pub consumption: RequirementVector,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeleted {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: ConsumingLine"))]
pub enum OrderEvent<L> {
    OrderCreated(OrderCreated<L>),
    OrderStatusChanged(OrderStatusChanged),
    OrderLinesReplaced(OrderLinesReplaced<L>),
    ConsumptionAttached(ConsumptionAttached),
    ConsumptionReleased(ConsumptionReleased),
    OrderDeleted(OrderDeleted),
}

impl<L: ConsumingLine> Event for OrderEvent<L> {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderCreated(_) => "orders.order.created",
            OrderEvent::OrderStatusChanged(_) => "orders.order.status_changed",
            OrderEvent::OrderLinesReplaced(_) => "orders.order.lines_replaced",
            OrderEvent::ConsumptionAttached(_) => "orders.order.consumption_attached",
            OrderEvent::ConsumptionReleased(_) => "orders.order.consumption_released",
            OrderEvent::OrderDeleted(_) => "orders.order.deleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderCreated(e) => e.occurred_at,
            OrderEvent::OrderStatusChanged(e) => e.occurred_at,
            OrderEvent::OrderLinesReplaced(e) => e.occurred_at,
            OrderEvent::ConsumptionAttached(e) => e.occurred_at,
            OrderEvent::ConsumptionReleased(e) => e.occurred_at,
            OrderEvent::OrderDeleted(e) => e.occurred_at,
        }
    }

    fn moves_stock(&self) -> bool {
        matches!(
            self,
            OrderEvent::ConsumptionAttached(_) | OrderEvent::ConsumptionReleased(_)
        )
    }
}

impl<L: ConsumingLine> Aggregate for Order<L> {
    type Command = OrderCommand<L>;
    type Event = OrderEvent<L>;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderCreated(e) => {
                self.id = e.order_id;
                self.lines = e.lines.clone();
                self.status = e.status;
                self.consumption = None;
                self.created_at = Some(e.occurred_at);
                self.created = true;
                self.deleted = false;
            }
            OrderEvent::OrderStatusChanged(e) => {
                self.status = e.to;
            }
            OrderEvent::OrderLinesReplaced(e) => {
                self.lines = e.lines.clone();
            }
            OrderEvent::ConsumptionAttached(e) => {
                self.consumption = Some(e.consumption.clone());
            }
            OrderEvent::ConsumptionReleased(_) => {
                self.consumption = None;
            }
            OrderEvent::OrderDeleted(_) => {
                self.deleted = true;
            }
        }

        self.updated_at = Some(event.occurred_at());
        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::CreateOrder(cmd) => self.handle_create(cmd),
            OrderCommand::ChangeStatus(cmd) => self.handle_change_status(cmd),
            OrderCommand::ReplaceLines(cmd) => self.handle_replace_lines(cmd),
            OrderCommand::DeleteOrder(cmd) => self.handle_delete(cmd),
        }
    }
}

impl<L: ConsumingLine> Order<L> {
    fn ensure_live(&self) -> Result<(), DomainError> {
        if !self.created || self.deleted {
            return Err(DomainError::not_found(format!("order {}", self.id)));
        }
        Ok(())
    }

    fn ensure_order_id(&self, order_id: OrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn validate_lines(lines: &[L]) -> Result<(), DomainError> {
        if lines.is_empty() {
            return Err(DomainError::validation("order must have at least one line"));
        }
        lines.iter().try_for_each(|line| line.validate())
    }

    fn fresh_consumption(
        &self,
        consumption: &Option<RequirementVector>,
    ) -> Result<RequirementVector, DomainError> {
        consumption.clone().ok_or_else(|| {
            DomainError::invariant(format!(
                "order {} enters a consuming status without a computed consumption",
                self.id
            ))
        })
    }

    /// Release event for whatever is attached. Never-consumed orders release nothing.
    fn release(&self, occurred_at: DateTime<Utc>) -> Option<OrderEvent<L>> {
        self.consumption.as_ref().map(|consumption| {
            OrderEvent::ConsumptionReleased(ConsumptionReleased {
                order_id: self.id,
                consumption: consumption.clone(),
                occurred_at,
            })
        })
    }

    fn handle_create(&self, cmd: &CreateOrder<L>) -> Result<Vec<OrderEvent<L>>, DomainError> {
        if self.created {
            return Err(DomainError::conflict(format!("order {} already exists", cmd.order_id)));
        }
        Self::validate_lines(&cmd.lines)?;

        let mut events = vec![OrderEvent::OrderCreated(OrderCreated {
            order_id: cmd.order_id,
            lines: cmd.lines.clone(),
            status: cmd.status,
            occurred_at: cmd.occurred_at,
        })];

        if plan_transition(None, Some(cmd.status)) == TransitionAction::Apply {
            events.push(OrderEvent::ConsumptionAttached(ConsumptionAttached {
                order_id: cmd.order_id,
                consumption: self.fresh_consumption(&cmd.consumption)?,
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }

    fn handle_change_status(&self, cmd: &ChangeStatus) -> Result<Vec<OrderEvent<L>>, DomainError> {
        self.ensure_live()?;
        self.ensure_order_id(cmd.order_id)?;

        let action = self.plan_status_change(cmd.status);
        let mut events = Vec::new();

        if matches!(action, TransitionAction::Restore | TransitionAction::Reapply) {
            events.extend(self.release(cmd.occurred_at));
        }

        if action.needs_fresh_consumption() {
            events.push(OrderEvent::ConsumptionAttached(ConsumptionAttached {
                order_id: self.id,
                consumption: self.fresh_consumption(&cmd.consumption)?,
                occurred_at: cmd.occurred_at,
            }));
        }

        if cmd.status != self.status {
            events.push(OrderEvent::OrderStatusChanged(OrderStatusChanged {
                order_id: self.id,
                from: self.status,
                to: cmd.status,
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }

    fn handle_replace_lines(&self, cmd: &ReplaceLines<L>) -> Result<Vec<OrderEvent<L>>, DomainError> {
        self.ensure_live()?;
        self.ensure_order_id(cmd.order_id)?;
        Self::validate_lines(&cmd.lines)?;

        Ok(vec![OrderEvent::OrderLinesReplaced(OrderLinesReplaced {
            order_id: self.id,
            lines: cmd.lines.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteOrder) -> Result<Vec<OrderEvent<L>>, DomainError> {
        self.ensure_live()?;
        self.ensure_order_id(cmd.order_id)?;

        let mut events: Vec<_> = self.release(cmd.occurred_at).into_iter().collect();
        events.push(OrderEvent::OrderDeleted(OrderDeleted {
            order_id: self.id,
            occurred_at: cmd.occurred_at,
        }));
        Ok(events)
    }
}
