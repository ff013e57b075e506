//! Serial-bus provisioning
//!
//! A [`BusProvisioner`] resolves a logical bus index (SERCOM / SPI instance,
//! or chip-select number) to a live bus handle. The handle is an exclusive
//! capability: it is moved into the controller binder and never shared.

/// Logical bus instance / chip-select number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct BusIndex(u8);

impl BusIndex {
    /// Create a bus index.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Raw index.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for BusIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of bus handles.
pub trait BusProvisioner {
    /// Bus handle type
    type Bus;

    /// Acquire the bus for `index`.
    ///
    /// `None` means the bus is unavailable (absent, misconfigured or already
    /// handed out). Never panics.
    fn acquire_bus(&mut self, index: BusIndex) -> Option<Self::Bus>;
}

impl<T: BusProvisioner + ?Sized> BusProvisioner for &mut T {
    type Bus = T::Bus;

    fn acquire_bus(&mut self, index: BusIndex) -> Option<Self::Bus> {
        T::acquire_bus(self, index)
    }
}

/// Fixed table of bus handles, indexed by [`BusIndex`].
///
/// Each populated slot is handed out at most once; a caller disposing of a
/// display hands the bus back with [`BusSlots::release`] before bringing the
/// display up again.
pub struct BusSlots<B, const N: usize> {
    slots: [Option<B>; N],
}

impl<B, const N: usize> BusSlots<B, N> {
    /// Table with every slot empty.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Table populated from `slots`.
    pub fn from_slots(slots: [Option<B>; N]) -> Self {
        Self { slots }
    }

    /// Put `bus` in the slot for `index`.
    ///
    /// Returns the bus back if the index is outside the table or the slot is
    /// already occupied.
    pub fn release(&mut self, index: BusIndex, bus: B) -> Result<(), B> {
        match self.slots.get_mut(usize::from(index.get())) {
            Some(slot) if slot.is_none() => {
                *slot = Some(bus);
                Ok(())
            }
            _ => Err(bus),
        }
    }

    /// Whether a handle is waiting in the slot for `index`.
    pub fn is_available(&self, index: BusIndex) -> bool {
        matches!(self.slots.get(usize::from(index.get())), Some(Some(_)))
    }
}

impl<B, const N: usize> Default for BusSlots<B, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, const N: usize> BusProvisioner for BusSlots<B, N> {
    type Bus = B;

    fn acquire_bus(&mut self, index: BusIndex) -> Option<B> {
        self.slots.get_mut(usize::from(index.get()))?.take()
    }
}
