//! Collision detection against the basket and the bottom of the field
//!
//! Each object is tested once per tick: capture first, exit second. An object
//! that resolves is removed from the registry before its outcome is handed on,
//! so it can never be reported twice.

use std::ops::ControlFlow;

use super::events::{Outcome, OutcomeKind};
use super::registry::ObjectRegistry;
use super::state::{Basket, FallingObject};

/// Object's square bounding box overlaps the basket vertically and its center
/// lies within the basket horizontally (edges inclusive)
#[inline]
pub fn captures(object: &FallingObject, basket: &Basket) -> bool {
    object.bottom() >= basket.top()
        && object.top() <= basket.bottom()
        && object.pos.x >= basket.left()
        && object.pos.x <= basket.right()
}

/// Object's bottom edge is past the bottom of the field
#[inline]
pub fn exits(object: &FallingObject, field_height: f32) -> bool {
    object.bottom() > field_height
}

/// Tests objects against the basket and the field boundary
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    field_height: f32,
}

impl CollisionResolver {
    pub fn new(field_height: f32) -> Self {
        Self { field_height }
    }

    /// Outcome for a single object, capture taking precedence over exit
    pub fn classify(&self, object: &FallingObject, basket: &Basket) -> Option<OutcomeKind> {
        if captures(object, basket) {
            Some(OutcomeKind::Captured)
        } else if exits(object, self.field_height) {
            Some(OutcomeKind::Exited)
        } else {
            None
        }
    }

    /// Resolve every live object, removing the ones that leave play.
    ///
    /// Walks the registry from the back so removal doesn't disturb objects
    /// not yet visited. `on_outcome` may break to stop resolution early;
    /// objects not yet visited are left untouched.
    pub fn resolve<B>(
        &self,
        registry: &mut ObjectRegistry,
        basket: &Basket,
        mut on_outcome: impl FnMut(Outcome) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        for i in (0..registry.len()).rev() {
            let Some(kind) = registry.get(i).and_then(|o| self.classify(o, basket)) else {
                continue;
            };
            let object = registry.remove(i);
            let outcome = Outcome {
                kind,
                object: object.kind,
            };
            if let ControlFlow::Break(b) = on_outcome(outcome) {
                return ControlFlow::Break(b);
            }
        }
        ControlFlow::Continue(())
    }

    /// Resolve everything and collect the outcomes
    pub fn resolve_all(&self, registry: &mut ObjectRegistry, basket: &Basket) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        let _: ControlFlow<()> = self.resolve(registry, basket, |outcome| {
            outcomes.push(outcome);
            ControlFlow::Continue(())
        });
        outcomes
    }
}
