/*
 * The application-facing listener. The host application implements
 * `MainWindowListener`; the crate only calls it. Every method has an empty
 * default so applications override just what they consume.
 */
use crate::types::RenderSurface;

use std::cell::RefCell;
use std::rc::Rc;

pub trait MainWindowListener {
    /// The render panel has a native window and the frame timer is about to start.
    fn on_window_loaded(&mut self, _surface: RenderSurface) {}
    /// Called once per frame-timer tick.
    fn on_update(&mut self) {}
    fn on_render_panel_resized(&mut self) {}
    fn on_render_panel_mouse_button(&mut self, _left: bool, _right: bool, _x: f32, _y: f32) {}
    fn on_render_panel_mouse_move(&mut self, _x: f32, _y: f32) {}
    /// `delta` is in wheel notches.
    fn on_render_panel_mouse_wheel(&mut self, _delta: f32) {}
    fn on_tree_view_selection_changed(&mut self, _selected_tag: i32) {}
    fn on_model_prop_changed(&mut self, _name: &str, _value: &str) {}

    fn on_file_import_metro_model(&mut self, _path: &str) {}
    fn on_file_import_obj_model(&mut self, _path: &str) {}
    fn on_file_export_metro_model(&mut self, _path: &str) {}
    fn on_file_export_obj_model(&mut self, _path: &str) {}
    fn on_file_export_fbx_model(&mut self, _path: &str) {}

    fn on_debug_show_bounds(&mut self, _show: bool) {}
    fn on_debug_show_submodels_bounds(&mut self, _show: bool) {}
    fn on_debug_bounds_type_changed(&mut self, _new_type: &str) {}
    fn on_debug_skeleton_show_bones(&mut self, _show: bool) {}
    fn on_debug_skeleton_show_bones_links(&mut self, _show: bool) {}
    fn on_debug_skeleton_show_bones_names(&mut self, _show: bool) {}

    /// Gate for every export command.
    fn can_export_model(&self) -> bool {
        false
    }
}

/*
 * Shared, optional listener. Cloned into the render panel's input handler and
 * the frame timer callback. With no listener set every notification is a
 * no-op; a notification that arrives while the listener is already running
 * (re-entrant dispatch) is dropped.
 */
#[derive(Clone, Default)]
pub(crate) struct ListenerSlot(Rc<RefCell<Option<Box<dyn MainWindowListener>>>>);

impl ListenerSlot {
    pub(crate) fn set(&self, listener: Box<dyn MainWindowListener>) {
        *self.0.borrow_mut() = Some(listener);
    }

    pub(crate) fn clear(&self) -> Option<Box<dyn MainWindowListener>> {
        self.0.borrow_mut().take()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.borrow().is_some()
    }

    pub(crate) fn notify<R>(&self, f: impl FnOnce(&mut dyn MainWindowListener) -> R) -> Option<R> {
        match self.0.try_borrow_mut() {
            Ok(mut slot) => slot.as_mut().map(|listener| f(listener.as_mut())),
            Err(_) => {
                log::warn!("MainWindow: listener notification dropped during re-entrant dispatch");
                None
            }
        }
    }
}
