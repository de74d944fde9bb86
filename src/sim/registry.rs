//! Live falling objects, in spawn order

use super::state::FallingObject;

#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    objects: Vec<FallingObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: FallingObject) {
        self.objects.push(object);
    }

    /// Move every object down by `speed * dt`. Removal is left to collision
    /// resolution.
    pub fn advance(&mut self, dt: f32) {
        for object in &mut self.objects {
            object.fall(dt);
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn as_slice(&self) -> &[FallingObject] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = &FallingObject> {
        self.objects.iter()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&FallingObject> {
        self.objects.get(index)
    }

    /// Remove by index, keeping the order of the rest
    pub(crate) fn remove(&mut self, index: usize) -> FallingObject {
        self.objects.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObjectKind;

    #[test]
    fn test_advance_moves_by_speed() {
        let mut registry = ObjectRegistry::new();
        registry.insert(FallingObject::new(ObjectKind::Apple, 100.0, 200.0));
        registry.insert(FallingObject::new(ObjectKind::Rock, 300.0, 50.0));

        registry.advance(0.5);

        let ys: Vec<f32> = registry.iter().map(|o| o.pos.y).collect();
        assert_eq!(ys, vec![-20.0 + 100.0, -20.0 + 25.0]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut registry = ObjectRegistry::new();
        for (i, kind) in [ObjectKind::Apple, ObjectKind::Rock, ObjectKind::Bomb]
            .into_iter()
            .enumerate()
        {
            registry.insert(FallingObject::new(kind, i as f32 * 100.0, 100.0));
        }

        let removed = registry.remove(1);
        assert_eq!(removed.kind, ObjectKind::Rock);
        let kinds: Vec<_> = registry.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![ObjectKind::Apple, ObjectKind::Bomb]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
