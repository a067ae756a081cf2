// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart decorations drawn around the data: legend, color bars, shapes, menus.
//!
//! Decorations are optional. The passes look them up by name and method, and a missing one is
//! simply skipped.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use strata_cartesian::Graph;
use strata_core::Result;

/// Legend.
pub const LEGEND: &str = "legend";
/// Color bars of traces with a color scale.
pub const COLORBAR: &str = "colorbar";
/// Axis ticks, tick labels and axis titles.
pub const AXES: &str = "axes";
/// Layout shapes.
pub const SHAPES: &str = "shapes";
/// Layout annotations.
pub const ANNOTATIONS: &str = "annotations";
/// Layout images.
pub const IMAGES: &str = "images";
/// Range sliders below x axes.
pub const RANGESLIDER: &str = "rangeslider";
/// Range selector buttons.
pub const RANGESELECTOR: &str = "rangeselector";
/// Layout sliders.
pub const SLIDERS: &str = "sliders";
/// Update menus.
pub const UPDATEMENUS: &str = "updatemenus";
/// The mode bar.
pub const MODEBAR: &str = "modebar";
/// Hover and drag interactions.
pub const FX: &str = "fx";

/// Which entry point of a component a pass calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// (Re)draw the decoration.
    Draw,
    /// Refresh interaction handlers.
    UpdateFx,
    /// Restyle without relayout.
    Style,
}

/// A chart decoration.
///
/// Every method defaults to doing nothing, so a component only implements what it has.
pub trait Component {
    /// Draws the decoration.
    fn draw(&mut self, graph: &mut Graph) -> Result<()> {
        let _ = graph;
        Ok(())
    }

    /// Refreshes interaction handlers.
    fn update_fx(&mut self, graph: &mut Graph) -> Result<()> {
        let _ = graph;
        Ok(())
    }

    /// Restyles the decoration.
    fn style(&mut self, graph: &mut Graph) -> Result<()> {
        let _ = graph;
        Ok(())
    }
}

/// Components by name.
#[derive(Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Box<dyn Component>>,
}

impl core::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ComponentRegistry")
            .field("components", &names)
            .finish()
    }
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, component: impl Component + 'static) {
        let name = name.into();
        tracing::debug!(component = name.as_str(), "registering component");
        self.components.insert(name, Box::new(component));
    }

    /// Whether a component is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Calls `method` of the component `name`. Returns whether it was registered.
    pub fn call(&mut self, name: &str, method: Method, graph: &mut Graph) -> Result<bool> {
        let Some(component) = self.components.get_mut(name) else {
            tracing::trace!(component = name, ?method, "component not registered, skipping");
            return Ok(false);
        };
        match method {
            Method::Draw => component.draw(graph)?,
            Method::UpdateFx => component.update_fx(graph)?,
            Method::Style => component.style(graph)?,
        }
        Ok(true)
    }

    /// Calls `Draw` on each named component in order.
    pub fn draw_all(&mut self, names: &[&str], graph: &mut Graph) -> Result<()> {
        for name in names {
            self.call(name, Method::Draw, graph)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::rc::Rc;
    use core::cell::RefCell;

    use strata_core::Error;

    use super::*;

    struct Recorder {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Component for Recorder {
        fn draw(&mut self, _graph: &mut Graph) -> Result<()> {
            self.log.borrow_mut().push("draw");
            Ok(())
        }
    }

    struct Failing;

    impl Component for Failing {
        fn draw(&mut self, _graph: &mut Graph) -> Result<()> {
            Err(Error::Plot {
                module: "legend".into(),
                message: "no room".into(),
            })
        }
    }

    #[test]
    fn absent_components_and_methods_are_no_ops() {
        let mut graph = Graph::new("g").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ComponentRegistry::new();
        registry.insert(LEGEND, Recorder { log: Rc::clone(&log) });

        assert!(!registry.call(COLORBAR, Method::Draw, &mut graph).unwrap());
        assert!(registry.call(LEGEND, Method::UpdateFx, &mut graph).unwrap());
        assert!(log.borrow().is_empty(), "update_fx defaults to nothing");

        registry
            .draw_all(&[SHAPES, LEGEND, IMAGES], &mut graph)
            .unwrap();
        assert_eq!(*log.borrow(), ["draw"]);
    }

    #[test]
    fn component_errors_propagate() {
        let mut graph = Graph::new("g").unwrap();
        let mut registry = ComponentRegistry::new();
        registry.insert(LEGEND, Failing);
        assert!(registry.call(LEGEND, Method::Draw, &mut graph).is_err());
        assert!(registry.call(LEGEND, Method::Style, &mut graph).unwrap());
    }
}
