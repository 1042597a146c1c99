use anyhow::Result;

mod api;
mod app;
mod features;
mod shared;
mod ui;
mod widgets;

#[cfg(test)]
mod widgets_tests;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the application
    let mut app = app::App::new()?;

    // Run the TUI
    app.run().await?;

    Ok(())
}
