/// Loading state of an entity's visual. `H` is whatever handle the host uses.
///
/// Fallbacks are swapped in when the real asset fails, so per-frame code only
/// ever deals with [`Visual::handle`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Visual<H> {
    #[default]
    Pending,
    Ready(H),
    Fallback(H),
}

impl<H> Visual<H> {
    pub fn handle(&self) -> Option<&H> {
        match self {
            Visual::Pending => None,
            Visual::Ready(handle) | Visual::Fallback(handle) => Some(handle),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Visual::Pending)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Visual::Fallback(_))
    }

    /// Settles a pending visual. An already settled one is left alone.
    pub fn resolve(&mut self, loaded: Result<H, H>) {
        if self.is_pending() {
            *self = match loaded {
                Ok(handle) => Visual::Ready(handle),
                Err(fallback) => Visual::Fallback(fallback),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_once() {
        let mut visual = Visual::<&str>::default();
        assert!(visual.handle().is_none());

        visual.resolve(Err("capsule"));
        assert!(visual.is_fallback());
        assert_eq!(visual.handle(), Some(&"capsule"));

        visual.resolve(Ok("enemy.glb"));
        assert_eq!(visual.handle(), Some(&"capsule"));
    }
}
