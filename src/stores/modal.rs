use crate::model::Film;

/// Whether the sign-in modal is open, and which film's favorite toggle opened
/// it.
#[derive(Debug, Default, Clone)]
pub struct ModalState {
    open_modal: bool,
    pending_film: Option<Film>,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open_modal
    }

    pub fn pending_film(&self) -> Option<&Film> {
        self.pending_film.as_ref()
    }

    /// Opens the modal. A film passed here replaces the pending one; `None`
    /// keeps whatever is already pending.
    pub fn open_modal_window(&mut self, film: Option<Film>) {
        if let Some(film) = film {
            self.pending_film = Some(film);
        }

        self.open_modal = true;
    }

    pub fn close_modal_window(&mut self) {
        self.open_modal = false;
        self.pending_film = None;
    }

    /// Returns the pending film and forgets it, so each film is handed out at
    /// most once.
    pub fn take_pending_film(&mut self) -> Option<Film> {
        self.pending_film.take()
    }
}
