//! The application model.
//!
//! [`App`] owns the [`ViewState`] and routes two kinds of messages over it:
//! key presses, and the [`AppMsg`] results of commands it started earlier.
//! Every route produces [`Effects`]; the runtime gets them as one batched
//! command, tests can await the backend work on its own.
//!
//! Backend responses that fill a listing carry a generation token and are
//! dropped when a newer request has been made since (see
//! [`state::Generation`]).

mod commands;
pub mod forms;
pub mod keys;
pub mod msg;
pub mod state;


use self::forms::{handle_key, FormAction};
use self::keys::{AppKeyMap, Screen};
use self::msg::{AppMsg, AuthAction, Purpose};
use self::state::{Listing, Modal, ViewState};
use crate::backend::Backend;
use crate::config::Config;
use crate::domain::{Complaint, Session, StatusUpdate};
use crate::error::{DeskError, ValidationError};
use crate::help;
use crate::listing::Pagination;
use crate::notify::{DismissMsg, Notice, Toaster};
use crate::upload::Attachment;
use crate::view::{self, admin, auth, detail, form, home, listing, Section};
use crate::view::auth::AuthMode;
use crate::view::listing::{Audience, TableView};
use bubbletea_rs::{Cmd, KeyMsg, Model, Msg, WindowSizeMsg};
use crossterm::event::KeyCode;
use once_cell::sync::OnceCell;
use tokio::sync::watch;

/// What the application runs against.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Identity, complaint and blob collaborators.
    pub backend: Backend,
    /// Resolved configuration.
    pub config: Config,
}

static CONTEXT: OnceCell<AppContext> = OnceCell::new();

/// Installs the context [`App`] starts from when the runtime calls
/// [`Model::init`]. Hands the context back if one is already installed.
pub fn install(ctx: AppContext) -> std::result::Result<(), AppContext> {
    CONTEXT.set(ctx)
}

/// Commands produced by one message.
#[derive(Default)]
pub struct Effects {
    /// Backend work whose results feed back into the model.
    pub tasks: Vec<Cmd>,
    /// Notice timers and the session watch.
    pub background: Vec<Cmd>,
    /// The program should exit.
    pub quit: bool,
}

impl Effects {
    fn none() -> Self {
        Self::default()
    }

    fn task(cmd: Cmd) -> Self {
        Self {
            tasks: vec![cmd],
            ..Self::default()
        }
    }

    fn background(cmd: Cmd) -> Self {
        Self {
            background: vec![cmd],
            ..Self::default()
        }
    }

    fn quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }

    fn and(mut self, other: Effects) -> Self {
        self.tasks.extend(other.tasks);
        self.background.extend(other.background);
        self.quit |= other.quit;
        self
    }

    /// Folds everything into one runtime command.
    pub fn into_cmd(self) -> Option<Cmd> {
        let mut cmds = self.tasks;
        cmds.extend(self.background);
        if self.quit {
            cmds.push(bubbletea_rs::quit());
        }
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(bubbletea_rs::batch(cmds)),
        }
    }
}

/// The complaint desk.
pub struct App {
    state: ViewState,
    keys: AppKeyMap,
    toaster: Toaster,
    help: help::Model,
    ctx: AppContext,
    session_rx: watch::Receiver<Option<Session>>,
}

impl App {
    /// A model over `ctx`, showing whatever session the provider already has.
    pub fn new(ctx: AppContext) -> Self {
        let session_rx = ctx.backend.identity.subscribe();
        let state = ViewState {
            session: session_rx.borrow().clone(),
            width: 80,
            ..ViewState::default()
        };
        Self {
            state,
            keys: AppKeyMap::default(),
            toaster: Toaster::new(ctx.config.ui.notice_lifetime()),
            help: help::Model::new(),
            ctx,
            session_rx,
        }
    }

    /// Starts the session watch and, when already signed in, the first
    /// loads.
    pub fn start(&mut self) -> Effects {
        let watch = Effects::background(commands::watch_session(self.session_rx.clone()));
        if self.state.session.is_some() {
            watch.and(self.enter_session())
        } else {
            watch
        }
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The visible notice.
    pub fn notice(&self) -> Option<&Notice> {
        self.toaster.current()
    }

    fn backend(&self) -> Backend {
        self.ctx.backend.clone()
    }

    fn page_size(&self) -> usize {
        self.ctx.config.listing.page_size
    }

    fn success(&mut self, text: impl Into<String>) -> Effects {
        Effects::background(self.toaster.success(text))
    }

    fn danger(&mut self, text: impl Into<String>) -> Effects {
        Effects::background(self.toaster.danger(text))
    }

    fn warning(&mut self, text: impl Into<String>) -> Effects {
        Effects::background(self.toaster.warning(text))
    }

    /// Routes one runtime message.
    pub fn dispatch(&mut self, msg: Msg) -> Effects {
        if let Some(d) = msg.downcast_ref::<DismissMsg>() {
            self.toaster.dismiss(d);
            return Effects::none();
        }
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.state.width = size.width as usize;
            self.help.width = self.state.width;
            return Effects::none();
        }
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.on_key(key, &msg);
        }
        match msg.downcast::<AppMsg>() {
            Ok(m) => self.on_result(*m),
            Err(_) => Effects::none(),
        }
    }

    // ---- keys ----

    fn on_key(&mut self, key: &KeyMsg, msg: &Msg) -> Effects {
        if self.keys.quit.matches(key) {
            return Effects::quit();
        }
        if self.state.session.is_none() {
            return self.auth_key(key, msg);
        }
        if self.state.modal.is_open() {
            return self.modal_key(key, msg);
        }
        if self.state.section == Section::NewComplaint {
            return self.form_key(key, msg);
        }
        self.section_key(key, msg)
    }

    fn auth_key(&mut self, key: &KeyMsg, msg: &Msg) -> Effects {
        let auth = &mut self.state.auth;
        if auth.busy {
            return Effects::none();
        }
        if self.keys.toggle_register.matches(key) {
            auth.mode = match auth.mode {
                AuthMode::Login => AuthMode::Register,
                AuthMode::Register => AuthMode::Login,
            };
            return Effects::none();
        }
        let action = match auth.mode {
            AuthMode::Login => handle_key(&mut auth.login, &self.keys, key, msg),
            AuthMode::Register => handle_key(&mut auth.register, &self.keys, key, msg),
        };
        match action {
            FormAction::Submit => self.submit_auth(),
            FormAction::Cancel => {
                self.state.auth.mode = AuthMode::Login;
                Effects::none()
            }
            _ => Effects::none(),
        }
    }

    fn submit_auth(&mut self) -> Effects {
        let auth = &self.state.auth;
        let checked = match auth.mode {
            AuthMode::Login => auth
                .login
                .credentials()
                .map(|(email, password)| commands::login(self.backend(), email, password)),
            AuthMode::Register => auth
                .register
                .registration()
                .map(|registration| commands::register(self.backend(), registration)),
        };
        let cmd = match checked {
            Ok(cmd) => cmd,
            Err(e) => return self.danger(e.to_string()),
        };
        self.state.auth.busy = true;
        Effects::task(cmd)
    }

    fn section_key(&mut self, key: &KeyMsg, msg: &Msg) -> Effects {
        if self.keys.quit_plain.matches(key) {
            return Effects::quit();
        }
        if self.keys.help.matches(key) {
            self.state.show_help = !self.state.show_help;
            self.help.show_all = self.state.show_help;
            return Effects::none();
        }
        if self.keys.logout.matches(key) {
            return Effects::task(commands::logout(self.backend()));
        }
        if let Some(i) = self.keys.sections.iter().position(|b| b.matches(key)) {
            return match Section::visible(self.state.is_admin()).get(i) {
                Some(&section) => self.navigate(section),
                None => Effects::none(),
            };
        }
        if self.keys.refresh.matches(key) {
            return self.refresh();
        }
        match self.state.section {
            Section::MyComplaints => self.table_key(Audience::Student, key, msg),
            Section::Admin => self.table_key(Audience::Admin, key, msg),
            _ => Effects::none(),
        }
    }

    fn table_key(&mut self, audience: Audience, key: &KeyMsg, msg: &Msg) -> Effects {
        let page_size = self.page_size();
        let listing = match audience {
            Audience::Student => &mut self.state.mine,
            Audience::Admin => &mut self.state.admin.listing,
        };
        if self.keys.rows.line_up.matches(key) {
            listing.select_offset(-1, page_size);
            return Effects::none();
        }
        if self.keys.rows.line_down.matches(key) {
            listing.select_offset(1, page_size);
            return Effects::none();
        }
        let pagination = Pagination::for_len(listing.items.len(), page_size, listing.page);
        let selected = listing.selected_item(page_size).cloned();

        let pages = self.keys.pages.clone();
        if let Some(fx) = pagination.update(&pages, msg, |page| self.load_page(audience, page)) {
            return fx;
        }

        if audience == Audience::Admin {
            if self.keys.filter_status.matches(key) {
                self.state.admin.filter.cycle_status();
                return self.reload_filtered();
            }
            if self.keys.filter_category.matches(key) {
                self.state.admin.filter.cycle_category();
                return self.reload_filtered();
            }
        }

        let Some(c) = selected else {
            return Effects::none();
        };
        if self.keys.view.matches(key) {
            return Effects::task(commands::fetch(self.backend(), c.id, Purpose::View));
        }
        match audience {
            Audience::Student if self.keys.edit.matches(key) => {
                if !c.is_editable() {
                    return self.warning(ValidationError::NotEditable.to_string());
                }
                Effects::task(commands::fetch(self.backend(), c.id, Purpose::Edit))
            }
            Audience::Student if self.keys.delete.matches(key) => {
                if !c.is_editable() {
                    return self.warning(ValidationError::NotEditable.to_string());
                }
                self.state.modal = Modal::ConfirmDelete(c);
                Effects::none()
            }
            Audience::Admin if self.keys.manage.matches(key) => {
                Effects::task(commands::fetch(self.backend(), c.id, Purpose::Manage))
            }
            _ => Effects::none(),
        }
    }

    fn modal_key(&mut self, key: &KeyMsg, msg: &Msg) -> Effects {
        match &mut self.state.modal {
            Modal::None => Effects::none(),
            Modal::Detail(_) => {
                if self.keys.cancel.matches(key) || self.keys.deny.matches(key) {
                    self.state.modal = Modal::None;
                }
                Effects::none()
            }
            Modal::ConfirmDelete(c) => {
                if self.keys.confirm.matches(key) {
                    let id = c.id.clone();
                    self.state.modal = Modal::None;
                    tracing::info!(%id, "deleting complaint");
                    return Effects::task(commands::delete(self.backend(), id));
                }
                if self.keys.deny.matches(key) {
                    self.state.modal = Modal::None;
                }
                Effects::none()
            }
            Modal::Manage(manage) => {
                if manage.busy {
                    return Effects::none();
                }
                match handle_key(manage, &self.keys, key, msg) {
                    FormAction::Submit => self.save_status(),
                    FormAction::Cancel => {
                        self.state.modal = Modal::None;
                        Effects::none()
                    }
                    _ => Effects::none(),
                }
            }
        }
    }

    fn save_status(&mut self) -> Effects {
        if !self.state.is_admin() {
            return self.warning(ValidationError::NotPermitted.to_string());
        }
        let Modal::Manage(manage) = &mut self.state.modal else {
            return Effects::none();
        };
        manage.busy = true;
        let update = StatusUpdate {
            status: manage.status,
            admin_comment: manage.comment.value().trim().to_string(),
        };
        let id = manage.complaint.id.clone();
        Effects::task(commands::update_status(self.backend(), id, update))
    }

    fn form_key(&mut self, key: &KeyMsg, msg: &Msg) -> Effects {
        let form = &mut self.state.form;
        if form.busy {
            return Effects::none();
        }
        if self.keys.remove_image.matches(key) {
            form.remove_image();
            return Effects::none();
        }
        if key.key == KeyCode::Enter && form.image_field_focused() {
            let path = form.image_path.value().trim().to_string();
            let attached = form
                .attachment
                .as_ref()
                .is_some_and(|a| a.path.to_string_lossy() == path.as_str());
            if !path.is_empty() && !attached {
                let limit = self.ctx.config.uploads.max_bytes;
                return Effects::task(commands::attach(path, limit));
            }
        }
        match handle_key(form, &self.keys, key, msg) {
            FormAction::Submit => self.submit_form(),
            FormAction::Cancel => {
                let back = if self.state.form.editing.is_some() {
                    Section::MyComplaints
                } else {
                    Section::Home
                };
                self.state.form.reset();
                self.navigate(back)
            }
            _ => Effects::none(),
        }
    }

    fn submit_form(&mut self) -> Effects {
        let Some(session) = self.state.session.clone() else {
            return Effects::none();
        };
        match self.state.form.draft() {
            Ok(draft) => {
                self.state.form.busy = true;
                let limit = self.ctx.config.uploads.max_bytes;
                Effects::task(commands::save(self.backend(), session, draft, limit))
            }
            Err(e) => self.danger(e.to_string()),
        }
    }

    // ---- navigation and loads ----

    fn enter_session(&mut self) -> Effects {
        let home = if self.state.is_admin() {
            Section::Admin
        } else {
            Section::Home
        };
        self.navigate(home)
    }

    fn navigate(&mut self, section: Section) -> Effects {
        if section == Section::Admin && !self.state.is_admin() {
            return self.warning(ValidationError::NotPermitted.to_string());
        }
        self.state.section = section;
        self.state.modal = Modal::None;
        match section {
            Section::Home => self.load_home(),
            Section::MyComplaints => self.load_mine(1),
            Section::NewComplaint => {
                self.state.form.reset();
                Effects::none()
            }
            Section::Admin => self.load_admin(1).and(self.load_stats()),
        }
    }

    fn refresh(&mut self) -> Effects {
        match self.state.section {
            Section::Home => self.load_home(),
            Section::MyComplaints => self.load_mine(self.state.mine.page),
            Section::Admin => self
                .load_admin(self.state.admin.listing.page)
                .and(self.load_stats()),
            Section::NewComplaint => Effects::none(),
        }
    }

    fn reload_filtered(&mut self) -> Effects {
        self.state.admin.listing.selected = 0;
        self.load_admin(1)
    }

    fn load_page(&mut self, audience: Audience, page: usize) -> Effects {
        match audience {
            Audience::Student => self.load_mine(page),
            Audience::Admin => self.load_admin(page),
        }
    }

    fn load_home(&mut self) -> Effects {
        let Some(owner) = self.state.session.as_ref().map(|s| s.user_id.clone()) else {
            return Effects::none();
        };
        let generation = self.state.home.generation.begin();
        let recent = self.ctx.config.listing.recent_activity;
        Effects::task(commands::load_home(self.backend(), owner, recent, generation))
    }

    fn load_mine(&mut self, page: usize) -> Effects {
        let Some(owner) = self.state.session.as_ref().map(|s| s.user_id.clone()) else {
            return Effects::none();
        };
        let generation = self.state.mine.generation.begin();
        tracing::debug!(page, generation, "loading own complaints");
        Effects::task(commands::load_mine(self.backend(), owner, page, generation))
    }

    fn load_admin(&mut self, page: usize) -> Effects {
        if !self.state.is_admin() {
            return Effects::none();
        }
        let generation = self.state.admin.listing.generation.begin();
        let filter = self.state.admin.filter;
        tracing::debug!(page, generation, ?filter, "loading admin listing");
        Effects::task(commands::load_admin(self.backend(), filter, page, generation))
    }

    fn load_stats(&mut self) -> Effects {
        if !self.state.is_admin() {
            return Effects::none();
        }
        let generation = self.state.admin.stats_generation.begin();
        Effects::task(commands::load_stats(self.backend(), generation))
    }

    // ---- command results ----

    fn on_result(&mut self, msg: AppMsg) -> Effects {
        match msg {
            AppMsg::SessionChanged(reported) => self.on_session(reported),
            AppMsg::AuthDone { action, result } => {
                self.state.auth.busy = false;
                match (action, result) {
                    (AuthAction::Login, Ok(())) => self.success("Logged in successfully!"),
                    (AuthAction::Register, Ok(())) => {
                        self.state.auth.reset();
                        self.success("Account created successfully!")
                    }
                    (AuthAction::Logout, Ok(())) => self.success("Logged out successfully!"),
                    (action, Err(e)) => {
                        tracing::warn!(?action, error = %e, "auth request failed");
                        self.danger(e.to_string())
                    }
                }
            }
            AppMsg::HomeLoaded { generation, result } => {
                if !self.state.home.generation.accept(generation) {
                    return Effects::none();
                }
                match result {
                    Ok(data) => {
                        self.state.home.counts = data.counts;
                        self.state.home.recent = data.recent;
                    }
                    Err(e) => tracing::error!(error = %e, "failed to load home data"),
                }
                Effects::none()
            }
            AppMsg::MineLoaded {
                generation,
                page,
                result,
            } => {
                let page_size = self.page_size();
                if !self.state.mine.generation.accept(generation) {
                    return Effects::none();
                }
                self.apply_listing(Audience::Student, page, result, page_size)
            }
            AppMsg::AdminLoaded {
                generation,
                page,
                result,
            } => {
                let page_size = self.page_size();
                if !self.state.admin.listing.generation.accept(generation) {
                    return Effects::none();
                }
                self.apply_listing(Audience::Admin, page, result, page_size)
            }
            AppMsg::StatsLoaded { generation, result } => {
                if !self.state.admin.stats_generation.accept(generation) {
                    return Effects::none();
                }
                match result {
                    Ok(stats) => {
                        self.state.admin.counts = stats.counts;
                        self.state.admin.by_category = stats.by_category;
                        Effects::none()
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to load dashboard statistics");
                        self.danger("Failed to load dashboard statistics")
                    }
                }
            }
            AppMsg::Fetched {
                purpose,
                id,
                result,
            } => match result {
                Ok(Some(c)) => self.open(purpose, c),
                Ok(None) => {
                    tracing::debug!(%id, "complaint no longer exists");
                    Effects::none()
                }
                Err(e) => {
                    tracing::error!(%id, ?purpose, error = %e, "failed to fetch complaint");
                    self.danger(purpose.failure())
                }
            },
            AppMsg::Attached(result) => self.on_attached(result),
            AppMsg::Saved { edited, result } => self.on_saved(edited, result),
            AppMsg::Deleted(result) => match result {
                Ok(()) => {
                    let page = self.state.mine.page;
                    self.success("Complaint deleted successfully!")
                        .and(self.load_mine(page))
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to delete complaint");
                    self.danger("Failed to delete complaint")
                }
            },
            AppMsg::StatusSaved(result) => match result {
                Ok(c) => {
                    tracing::info!(id = %c.id, status = %c.status, "complaint status updated");
                    self.state.modal = Modal::None;
                    let page = self.state.admin.listing.page;
                    self.success("Complaint updated successfully!")
                        .and(self.load_admin(page))
                        .and(self.load_stats())
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to update complaint");
                    if let Modal::Manage(manage) = &mut self.state.modal {
                        manage.busy = false;
                    }
                    self.danger("Failed to update complaint")
                }
            },
        }
    }

    fn on_session(&mut self, reported: Option<Session>) -> Effects {
        let session = self.session_rx.borrow_and_update().clone();
        if session != reported {
            tracing::debug!("session changed again before it was applied");
        }
        let watch = Effects::background(commands::watch_session(self.session_rx.clone()));
        if self.state.session == session {
            return watch;
        }
        self.state.session = session;
        self.state.auth.reset();
        match &self.state.session {
            Some(s) => {
                tracing::info!(user = %s.user_id, role = s.role.label(), "signed in");
                watch.and(self.enter_session())
            }
            None => {
                tracing::info!("signed out");
                self.state.clear_account_data();
                self.state.section = Section::Home;
                watch
            }
        }
    }

    fn apply_listing(
        &mut self,
        audience: Audience,
        page: usize,
        result: crate::error::BackendResult<Vec<Complaint>>,
        page_size: usize,
    ) -> Effects {
        let listing: &mut Listing = match audience {
            Audience::Student => &mut self.state.mine,
            Audience::Admin => &mut self.state.admin.listing,
        };
        match result {
            Ok(items) => {
                listing.apply(page, items, page_size);
                Effects::none()
            }
            Err(e) => {
                tracing::error!(?audience, page, error = %e, "failed to load complaints");
                self.danger("Failed to load complaints")
            }
        }
    }

    fn open(&mut self, purpose: Purpose, c: Complaint) -> Effects {
        match purpose {
            Purpose::View => {
                self.state.modal = Modal::Detail(c);
                Effects::none()
            }
            Purpose::Edit => {
                let owned = self
                    .state
                    .session
                    .as_ref()
                    .is_some_and(|s| s.user_id == c.submitter_id);
                if !owned {
                    return self.warning(ValidationError::NotOwner.to_string());
                }
                if !c.is_editable() {
                    return self.warning(ValidationError::NotEditable.to_string());
                }
                self.state.form.load(&c);
                self.state.modal = Modal::None;
                self.state.section = Section::NewComplaint;
                Effects::none()
            }
            Purpose::Manage => {
                if !self.state.is_admin() {
                    return self.warning(ValidationError::NotPermitted.to_string());
                }
                self.state.modal = Modal::Manage(forms::ManageForm::new(c));
                Effects::none()
            }
        }
    }

    fn on_attached(&mut self, result: Result<Attachment, ValidationError>) -> Effects {
        let form = &mut self.state.form;
        match result {
            Ok(a) => {
                if a.path.to_string_lossy() == form.image_path.value().trim() {
                    form.attachment = Some(a);
                }
                Effects::none()
            }
            Err(e) => {
                form.clear_file_input();
                self.danger(e.to_string())
            }
        }
    }

    fn on_saved(&mut self, edited: bool, result: Result<Complaint, DeskError>) -> Effects {
        self.state.form.busy = false;
        match result {
            Ok(c) => {
                tracing::info!(id = %c.id, edited, "complaint stored");
                let text = if edited {
                    "Complaint updated successfully!"
                } else {
                    "Complaint submitted successfully!"
                };
                self.state.form.reset();
                self.success(text).and(self.navigate(Section::MyComplaints))
            }
            Err(DeskError::Validation(e)) => {
                if matches!(
                    e,
                    ValidationError::UploadTooLarge { .. } | ValidationError::UnreadableUpload { .. }
                ) {
                    self.state.form.clear_file_input();
                }
                self.danger(e.to_string())
            }
            Err(e) => {
                tracing::error!(error = %e, edited, "failed to submit complaint");
                self.danger("Failed to submit complaint")
            }
        }
    }

    // ---- view ----

    fn screen(&self) -> Screen {
        if self.state.session.is_none() {
            Screen::Auth
        } else if self.state.modal.is_open() {
            Screen::Dialog
        } else {
            match self.state.section {
                Section::Home => Screen::Home,
                Section::MyComplaints => Screen::Table { admin: false },
                Section::NewComplaint => Screen::Form,
                Section::Admin => Screen::Table { admin: true },
            }
        }
    }

    fn table<'a>(&self, audience: Audience, l: &'a Listing) -> TableView<'a> {
        let page_size = self.page_size();
        TableView {
            audience,
            visible: l.visible(page_size),
            pagination: Pagination::for_len(l.items.len(), page_size, l.page),
            selected: l.selected,
            preview_len: self.ctx.config.listing.description_preview,
            loading: l.generation.in_flight(),
        }
    }

    fn render_section(&self, session: &Session) -> String {
        let s = &self.state;
        match s.section {
            Section::Home => home::render(&home::HomeView {
                name: session.name.clone(),
                counts: s.home.counts,
                recent: s.home.recent.clone(),
            }),
            Section::MyComplaints => listing::render(&self.table(Audience::Student, &s.mine)),
            Section::NewComplaint => form::render(&form::FormView {
                editing: s.form.editing.is_some(),
                fields: s.form.fields(),
                attachment: s.form.attachment.as_ref().map(Attachment::summary),
                existing_image: s.form.existing_image.clone(),
                busy: s.form.busy,
            }),
            Section::Admin => admin::render(&admin::AdminView {
                counts: s.admin.counts,
                by_category: s.admin.by_category.clone(),
                filter: s.admin.filter,
                table: self.table(Audience::Admin, &s.admin.listing),
            }),
        }
    }

    fn render_modal(&self) -> Option<String> {
        let audience = if self.state.section == Section::Admin {
            Audience::Admin
        } else {
            Audience::Student
        };
        match &self.state.modal {
            Modal::None => None,
            Modal::Detail(c) => Some(detail::render(&detail::DetailView {
                complaint: c,
                audience,
            })),
            Modal::Manage(m) => Some(detail::render_manage(&detail::ManageView {
                complaint: &m.complaint,
                fields: m.fields(),
                busy: m.busy,
            })),
            Modal::ConfirmDelete(c) => Some(detail::render_confirm_delete(c)),
        }
    }

    /// Renders the whole screen.
    pub fn render(&self) -> String {
        let main = match &self.state.session {
            None => {
                let a = &self.state.auth;
                auth::render(&auth::AuthView {
                    mode: a.mode,
                    fields: match a.mode {
                        AuthMode::Login => a.login.fields(),
                        AuthMode::Register => a.register.fields(),
                    },
                    busy: a.busy,
                })
            }
            Some(session) => {
                let nav = view::nav_bar(&view::NavBar {
                    sections: Section::visible(session.is_admin()),
                    active: self.state.section,
                    email: &session.email,
                });
                let body = self
                    .render_modal()
                    .unwrap_or_else(|| self.render_section(session));
                format!("{nav}\n\n{body}")
            }
        };
        let mut out = vec![main];
        let toast = self.toaster.view();
        if !toast.is_empty() {
            out.push(String::new());
            out.push(toast);
        }
        out.push(String::new());
        out.push(
            self.help
                .view(&self.keys.help_for(self.screen(), self.state.is_admin())),
        );
        out.join("\n")
    }
}

impl Model for App {
    fn init() -> (Self, Option<Cmd>) {
        let ctx = match CONTEXT.get() {
            Some(ctx) => ctx.clone(),
            None => {
                tracing::warn!("no application context installed, using an in-memory backend");
                AppContext {
                    backend: Backend::in_memory(),
                    config: Config::default(),
                }
            }
        };
        let mut app = App::new(ctx);
        let cmd = app.start().into_cmd();
        (app, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.dispatch(msg).into_cmd()
    }

    fn view(&self) -> String {
        self.render()
    }
}
