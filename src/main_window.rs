/*
 * Headless state and command routing of the model viewer's main window: the
 * render panel, the model tree, the property list, the bounds-type gallery,
 * ribbon switches, model import/export, and the per-frame update timer. Each
 * user action ends up as one `MainWindowListener` notification.
 *
 * Drawing these controls is left to the embedding application; this type
 * only keeps what they show and reacts to what they report.
 */
use crate::error::Result as PlatformResult;
use crate::file_dialogs::{FileDialogs, export_request, import_request};
use crate::listener::{ListenerSlot, MainWindowListener};
use crate::native_host::NativeWindowBackend;
use crate::render_panel::RenderPanel;
use crate::types::{
    BoundsType, DebugToggle, HostConfig, InputEvent, LogicalSize, ModelFileKind, ModelProperty,
    NativeWindowId, PixelSize, RenderSurface, TimerId, TreeItem,
};

use std::rc::Rc;

pub struct MainWindow<B: NativeWindowBackend + 'static> {
    backend: Rc<B>,
    render_panel: RenderPanel<B>,
    listener: ListenerSlot,
    dialogs: Box<dyn FileDialogs>,
    frame_timer: Option<TimerId>,
    tree_root: Option<TreeItem>,
    model_props: Vec<ModelProperty>,
    selected_bounds_type: BoundsType,
    skeleton_tab_enabled: bool,
    ribbon_minimized: bool,
}

impl<B: NativeWindowBackend + 'static> MainWindow<B> {
    pub fn new(backend: Rc<B>, config: HostConfig, dialogs: Box<dyn FileDialogs>) -> Self {
        Self {
            render_panel: RenderPanel::new(Rc::clone(&backend), config),
            backend,
            listener: ListenerSlot::default(),
            dialogs,
            frame_timer: None,
            tree_root: None,
            model_props: Vec::new(),
            selected_bounds_type: BoundsType::Box,
            skeleton_tab_enabled: true,
            ribbon_minimized: false,
        }
    }

    pub fn set_listener(&mut self, listener: Box<dyn MainWindowListener>) {
        self.listener.set(listener);
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_set()
    }

    pub fn take_listener(&mut self) -> Option<Box<dyn MainWindowListener>> {
        self.listener.clear()
    }

    pub fn render_panel(&self) -> &RenderPanel<B> {
        &self.render_panel
    }

    pub fn render_panel_window(&self) -> Option<NativeWindowId> {
        self.render_panel.native_window()
    }

    pub fn render_panel_pixel_size(&self) -> PlatformResult<PixelSize> {
        self.render_panel.pixel_size()
    }

    /*
     * Brings the window to life: hosts the render surface under `parent`,
     * routes its mouse input to the listener, starts the frame timer and
     * reports the surface. A failure after the surface exists destroys it
     * again, so the call can be retried.
     */
    pub fn on_window_loaded(&mut self, parent: NativeWindowId) -> PlatformResult<()> {
        let window = self.render_panel.prepare_hwnd(parent)?;

        let surface = match self.start_render_loop(window) {
            Ok(surface) => surface,
            Err(err) => {
                log::error!("MainWindow: loading render surface {window:?} failed: {err}");
                self.render_panel.teardown();
                return Err(err);
            }
        };

        self.listener
            .notify(|listener| listener.on_window_loaded(surface));
        Ok(())
    }

    fn start_render_loop(&mut self, window: NativeWindowId) -> PlatformResult<RenderSurface> {
        let surface = RenderSurface {
            window,
            size: self.render_panel.pixel_size()?,
        };

        let listener = self.listener.clone();
        self.render_panel
            .set_input_handler(Box::new(move |event| forward_input(&listener, event)));

        let ticker = self.listener.clone();
        let interval = self.render_panel.config().frame_interval;
        let timer = self.backend.start_frame_timer(
            interval,
            Box::new(move || {
                ticker.notify(|listener| listener.on_update());
            }),
        )?;
        log::debug!("MainWindow: loaded with surface {surface:?}, frame timer {timer:?} every {interval:?}");
        self.frame_timer = Some(timer);
        Ok(surface)
    }

    pub fn on_frame_tick(&self) {
        self.listener.notify(|listener| listener.on_update());
    }

    /// Listeners hear about resizes only once the render surface exists.
    pub fn on_render_panel_size_changed(&mut self, logical_size: LogicalSize) -> PlatformResult<()> {
        self.render_panel.on_size_changed(logical_size)?;
        if self.render_panel.native_window().is_some() {
            self.listener
                .notify(|listener| listener.on_render_panel_resized());
        }
        Ok(())
    }

    pub fn enable_skeleton_tab(&mut self, enabled: bool) {
        self.skeleton_tab_enabled = enabled;
    }

    pub fn is_skeleton_tab_enabled(&self) -> bool {
        self.skeleton_tab_enabled
    }

    pub fn collapse_ribbon(&mut self) {
        self.ribbon_minimized = true;
    }

    pub fn expand_ribbon(&mut self) {
        self.ribbon_minimized = false;
    }

    pub fn is_ribbon_minimized(&self) -> bool {
        self.ribbon_minimized
    }

    // Model tree

    /// An empty `root_text` leaves the tree empty.
    pub fn tree_view_reset(&mut self, root_text: &str, root_tag: i32) {
        self.tree_root = if root_text.is_empty() {
            None
        } else {
            let mut root = TreeItem::new(root_text, root_tag);
            root.expanded = true;
            Some(root)
        };
    }

    pub fn tree_view_add_sub(&mut self, text: &str, tag: i32) {
        match self.tree_root.as_mut() {
            Some(root) => root.children.push(TreeItem::new(text, tag)),
            None => log::debug!("MainWindow: tree has no root, dropping sub item '{text}'"),
        }
    }

    pub fn tree_root(&self) -> Option<&TreeItem> {
        self.tree_root.as_ref()
    }

    pub fn select_tree_item(&mut self, tag: i32) {
        if self.tree_root.as_ref().is_some_and(|root| root.contains_tag(tag)) {
            self.listener
                .notify(|listener| listener.on_tree_view_selection_changed(tag));
        } else {
            log::debug!("MainWindow: ignoring selection of unknown tree tag {tag}");
        }
    }

    // Property list

    pub fn model_props_set_array(&mut self, props: Option<Vec<(String, String)>>) {
        self.model_props = props
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| ModelProperty { name, value })
            .collect();
    }

    pub fn model_props(&self) -> &[ModelProperty] {
        &self.model_props
    }

    /// User edited the value of property `name`.
    pub fn edit_model_prop(&mut self, name: &str, value: &str) {
        let Some(prop) = self.model_props.iter_mut().find(|prop| prop.name == name) else {
            log::debug!("MainWindow: edit of unknown model property '{name}'");
            return;
        };
        prop.value = value.to_string();
        self.listener
            .notify(|listener| listener.on_model_prop_changed(name, value));
    }

    // Debug ribbon

    pub fn bounds_types(&self) -> &'static [BoundsType] {
        &BoundsType::ALL
    }

    pub fn selected_bounds_type(&self) -> BoundsType {
        self.selected_bounds_type
    }

    pub fn select_bounds_type(&mut self, bounds_type: BoundsType) {
        self.selected_bounds_type = bounds_type;
        self.listener
            .notify(|listener| listener.on_debug_bounds_type_changed(bounds_type.name()));
    }

    pub fn set_debug_toggle(&mut self, toggle: DebugToggle, on: bool) {
        self.listener.notify(|listener| match toggle {
            DebugToggle::ShowBounds => listener.on_debug_show_bounds(on),
            DebugToggle::ShowSubmodelsBounds => listener.on_debug_show_submodels_bounds(on),
            DebugToggle::SkeletonShowBones => listener.on_debug_skeleton_show_bones(on),
            DebugToggle::SkeletonShowBonesLinks => listener.on_debug_skeleton_show_bones_links(on),
            DebugToggle::SkeletonShowBonesNames => listener.on_debug_skeleton_show_bones_names(on),
        });
    }

    // Model files

    /// Returns the chosen path, or `None` if the kind cannot be imported or
    /// the dialog was cancelled.
    pub fn import_model(&mut self, kind: ModelFileKind) -> Option<String> {
        let Some(request) = import_request(kind) else {
            log::warn!("MainWindow: import of {kind:?} models is not supported");
            return None;
        };
        let path = self.dialogs.open_file(&request)?;
        self.listener.notify(|listener| match kind {
            ModelFileKind::MetroModel => listener.on_file_import_metro_model(&path),
            ModelFileKind::Obj => listener.on_file_import_obj_model(&path),
            ModelFileKind::Fbx => {}
        });
        Some(path)
    }

    /// Only offered when a listener is set and agrees to export.
    pub fn export_model(&mut self, kind: ModelFileKind) -> Option<String> {
        if self.listener.notify(|listener| listener.can_export_model()) != Some(true) {
            log::debug!("MainWindow: export of {kind:?} refused, nothing to export");
            return None;
        }
        let path = self.dialogs.save_file(&export_request(kind))?;
        self.listener.notify(|listener| match kind {
            ModelFileKind::MetroModel => listener.on_file_export_metro_model(&path),
            ModelFileKind::Obj => listener.on_file_export_obj_model(&path),
            ModelFileKind::Fbx => listener.on_file_export_fbx_model(&path),
        });
        Some(path)
    }

    /// Stops the frame timer and destroys the render surface.
    pub fn teardown(&mut self) {
        if let Some(timer) = self.frame_timer.take() {
            self.backend.stop_frame_timer(timer);
        }
        self.render_panel.teardown();
    }
}

impl<B: NativeWindowBackend + 'static> Drop for MainWindow<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn forward_input(listener: &ListenerSlot, event: InputEvent) {
    match event {
        InputEvent::MouseMove { x, y } => {
            listener.notify(|l| l.on_render_panel_mouse_move(x, y));
        }
        InputEvent::MouseButton { left, right, x, y } => {
            listener.notify(|l| l.on_render_panel_mouse_button(left, right, x, y));
        }
        InputEvent::MouseWheel { delta } => {
            listener.notify(|l| l.on_render_panel_mouse_wheel(delta));
        }
        InputEvent::HitTestQuery | InputEvent::FocusContextChange { .. } => {}
    }
}
