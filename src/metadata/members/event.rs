use std::sync::{Arc, OnceLock};

use crate::{
    metadata::{
        members::{MethodRc, MethodRef},
        token::{Token, TokenTable},
        typesystem::{CilTypeRc, CilTypeRef},
    },
    Catalog, Result,
};

#[allow(non_snake_case)]
/// All possible flags for `EventAttributes`
pub mod EventAttributes {
    /// Event is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// CLI provides 'special' behavior, depending upon the name of the event
    pub const RTSPECIAL_NAME: u32 = 0x0400;
}

/// A reference to an `Event`
pub type EventRc = Arc<Event>;
/// A vector that holds a list of `Event`
pub type EventList = Arc<boxcar::Vec<EventRc>>;

/// An event declared by a type
pub struct Event {
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `EventAttributes`
    pub flags: u32,
    /// The name of the event
    pub name: String,
    /// The delegate type of the handlers
    pub event_type: CilTypeRef,
    /// The `Method` that triggers '`OnAdd`'
    pub fn_on_add: OnceLock<MethodRef>,
    /// The `Method` that triggers '`OnRemove`'
    pub fn_on_remove: OnceLock<MethodRef>,
}

impl Event {
    /// The add accessor, if any
    #[must_use]
    pub fn adder(&self) -> Option<MethodRc> {
        self.fn_on_add.get().and_then(MethodRef::upgrade)
    }

    /// The remove accessor, if any
    #[must_use]
    pub fn remover(&self) -> Option<MethodRc> {
        self.fn_on_remove.get().and_then(MethodRef::upgrade)
    }

    /// Static if the add accessor is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.adder().is_some_and(|adder| adder.is_static())
    }

    /// Is `method` one of this event's accessors
    #[must_use]
    pub fn is_accessor(&self, method: &MethodRc) -> bool {
        [self.adder(), self.remover()]
            .iter()
            .flatten()
            .any(|accessor| Arc::ptr_eq(accessor, method))
    }
}

/// Fluent registration of an [`Event`] on its declaring type
pub struct EventBuilder<'a> {
    catalog: &'a Catalog,
    declaring: CilTypeRc,
    name: String,
    event_type: CilTypeRc,
    adder: Option<MethodRc>,
    remover: Option<MethodRc>,
}

impl<'a> EventBuilder<'a> {
    /// Start building an event `name` with handler type `event_type` on `declaring`
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        declaring: &CilTypeRc,
        name: &str,
        event_type: &CilTypeRc,
    ) -> Self {
        EventBuilder {
            catalog,
            declaring: declaring.clone(),
            name: name.to_string(),
            event_type: event_type.clone(),
            adder: None,
            remover: None,
        }
    }

    /// Use `method` as the add accessor
    #[must_use]
    pub fn adder(mut self, method: &MethodRc) -> Self {
        self.adder = Some(method.clone());
        self
    }

    /// Use `method` as the remove accessor
    #[must_use]
    pub fn remover(mut self, method: &MethodRc) -> Self {
        self.remover = Some(method.clone());
        self
    }

    /// Register the event on its declaring type
    ///
    /// # Errors
    /// Returns an error if an accessor is missing or declared by another type.
    pub fn build(self) -> Result<EventRc> {
        let (Some(adder), Some(remover)) = (&self.adder, &self.remover) else {
            return Err(malformed_error!(
                "Event '{}' needs both an add and a remove accessor",
                self.name
            ));
        };

        for accessor in [adder, remover] {
            if !accessor.declaring_type.get()?.is_same(&self.declaring) {
                return Err(malformed_error!(
                    "Accessor '{}' of event '{}' belongs to another type",
                    accessor.name,
                    self.name
                ));
            }
        }

        let event = Arc::new(Event {
            token: self.catalog.next_token(TokenTable::Event),
            flags: 0,
            name: self.name,
            event_type: (&self.event_type).into(),
            fn_on_add: OnceLock::new(),
            fn_on_remove: OnceLock::new(),
        });
        let _ = event.fn_on_add.set(MethodRef::new(adder));
        let _ = event.fn_on_remove.set(MethodRef::new(remover));

        self.declaring.events.push(event.clone());
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::members::MethodBuilder, test::CatalogFixture};

    #[test]
    fn test_event_accessors() {
        let fixture = CatalogFixture::new();

        let adder = MethodBuilder::new(&fixture.catalog, &fixture.widget, "add_Moved")
            .static_method()
            .build()
            .unwrap();
        let remover = MethodBuilder::new(&fixture.catalog, &fixture.widget, "remove_Moved")
            .static_method()
            .build()
            .unwrap();

        let event = EventBuilder::new(&fixture.catalog, &fixture.widget, "Moved", &fixture.handler)
            .adder(&adder)
            .remover(&remover)
            .build()
            .unwrap();

        assert!(event.is_static());
        assert!(event.is_accessor(&adder));
        assert!(event.is_accessor(&remover));
    }

    #[test]
    fn test_event_requires_both_accessors() {
        let fixture = CatalogFixture::new();

        let adder = MethodBuilder::new(&fixture.catalog, &fixture.widget, "add_Moved")
            .build()
            .unwrap();
        let result = EventBuilder::new(&fixture.catalog, &fixture.widget, "Moved", &fixture.handler)
            .adder(&adder)
            .build();
        assert!(result.is_err());
    }
}
