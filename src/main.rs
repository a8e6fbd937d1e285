use {color_eyre::eyre::Result, e6post::app::E6App};

fn main() -> Result<()> {
    color_eyre::install()?;

    if let Some(app) = E6App::init()? {
        app.run()?;
    }

    Ok(())
}
