//! Generic runtime for session orchestration.
//!
//! The Runtime drives the session event loop, coordinating between:
//! - [`App`]: session state machine
//! - [`Driver`]: platform-specific transport and view
//!
//! Events are processed strictly one at a time in arrival order. Sends are
//! fire-and-forget: a failed send is logged and dropped.

use crate::{App, AppAction, AppConfig, Driver};

/// Generic runtime that orchestrates App and Driver.
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime with a fresh session.
    pub fn new(driver: D, config: AppConfig) -> Self {
        Self::with_app(driver, App::new(config))
    }

    /// Create a runtime around an existing session.
    pub fn with_app(driver: D, app: App) -> Self {
        Self { driver, app }
    }

    /// Run the event loop until the driver runs dry or the user quits.
    ///
    /// The driver is stopped on every exit path, including errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to poll or render.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        let result = self.event_loop().await;
        self.driver.stop();
        result
    }

    async fn event_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        while !self.step().await? {}
        Ok(())
    }

    /// Process a single event.
    ///
    /// Returns `true` if the session should end.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to poll or render.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let Some(event) = self.driver.next_event().await? else {
            tracing::debug!("driver closed, ending session");
            return Ok(true);
        };

        let actions = self.app.handle(event);
        self.process_actions(actions).await
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::ScrollToLatest => self.driver.scroll_to_latest(&self.app)?,
                AppAction::Send { payload } => {
                    if let Err(e) = self.driver.send(payload).await {
                        tracing::warn!(error = %e, "send failed, dropping payload");
                    }
                },
                AppAction::Quit => return Ok(true),
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
