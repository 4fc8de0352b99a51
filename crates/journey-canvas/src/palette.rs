use std::time::{Duration, Instant};

/// Grace delay between pointer-leave and the palette actually closing.
pub const PALETTE_CLOSE_GRACE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteStatus {
  Closed,
  Open,
}

/// State machine for the node palette menu.
///
/// `Closed -> Open` on click or pointer-enter. `Open -> Closed` either
/// immediately (outside click) or after [`PALETTE_CLOSE_GRACE`] has elapsed
/// since pointer-leave, unless the pointer re-entered in the meantime.
/// Time is passed in by the caller, so the machine is fully deterministic.
#[derive(Debug)]
pub struct PaletteMenu {
  status: PaletteStatus,
  close_at: Option<Instant>,
}

impl Default for PaletteMenu {
  fn default() -> Self {
    Self {
      status: PaletteStatus::Closed,
      close_at: None,
    }
  }
}

impl PaletteMenu {
  pub fn status(&self) -> PaletteStatus {
    self.status
  }

  pub fn is_open(&self) -> bool {
    self.status == PaletteStatus::Open
  }

  /// Click or pointer-enter. Cancels any pending close.
  pub fn open(&mut self) {
    self.status = PaletteStatus::Open;
    self.close_at = None;
  }

  /// Outside click: close with no grace delay.
  pub fn close_now(&mut self) {
    self.status = PaletteStatus::Closed;
    self.close_at = None;
  }

  /// Pointer-leave: start the grace timer.
  pub fn schedule_close(&mut self, now: Instant) {
    if self.status == PaletteStatus::Open {
      self.close_at = Some(now + PALETTE_CLOSE_GRACE);
    }
  }

  /// Pointer re-entered before the grace delay elapsed.
  pub fn cancel_close(&mut self) {
    self.close_at = None;
  }

  /// Advance the timer. Returns the status after the tick.
  pub fn poll(&mut self, now: Instant) -> PaletteStatus {
    if let Some(close_at) = self.close_at {
      if now >= close_at {
        self.status = PaletteStatus::Closed;
        self.close_at = None;
      }
    }
    self.status
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn closes_after_grace_delay() {
    let mut menu = PaletteMenu::default();
    let t0 = Instant::now();

    menu.open();
    menu.schedule_close(t0);
    assert_eq!(menu.poll(t0 + PALETTE_CLOSE_GRACE / 2), PaletteStatus::Open);
    assert_eq!(menu.poll(t0 + PALETTE_CLOSE_GRACE), PaletteStatus::Closed);
  }

  #[test]
  fn reenter_cancels_pending_close() {
    let mut menu = PaletteMenu::default();
    let t0 = Instant::now();

    menu.open();
    menu.schedule_close(t0);
    menu.cancel_close();
    assert_eq!(
      menu.poll(t0 + PALETTE_CLOSE_GRACE * 2),
      PaletteStatus::Open
    );
  }

  #[test]
  fn outside_click_closes_immediately() {
    let mut menu = PaletteMenu::default();
    menu.open();
    menu.close_now();
    assert!(!menu.is_open());
  }

  #[test]
  fn schedule_close_on_closed_menu_is_a_noop() {
    let mut menu = PaletteMenu::default();
    let t0 = Instant::now();
    menu.schedule_close(t0);
    assert_eq!(menu.poll(t0 + PALETTE_CLOSE_GRACE), PaletteStatus::Closed);
  }
}
