//! RAII frame management for the [`Vm`].
//!
//! [`ScopedVm`] pushes a scope frame on creation and pops it on drop, so a
//! block, loop iteration or closure body never leaks its bindings, not even
//! when evaluation bails out early with `?`.

use std::ops::{Deref, DerefMut};

use super::Vm;

/// A VM with one extra scope frame; the frame is popped on drop.
pub(crate) struct ScopedVm<'guard, 'a, 'w> {
    vm: &'guard mut Vm<'a, 'w>,
}

impl Drop for ScopedVm<'_, '_, '_> {
    fn drop(&mut self) {
        self.vm.scopes.exit();
    }
}

impl<'a, 'w> Deref for ScopedVm<'_, 'a, 'w> {
    type Target = Vm<'a, 'w>;

    fn deref(&self) -> &Self::Target {
        self.vm
    }
}

impl DerefMut for ScopedVm<'_, '_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.vm
    }
}

impl<'a, 'w> Vm<'a, 'w> {
    /// Enter a fresh frame that is left when the guard drops.
    pub(crate) fn scoped(&mut self) -> ScopedVm<'_, 'a, 'w> {
        self.scopes.enter();
        ScopedVm { vm: self }
    }
}
