/// WF3D Terminal Demo - Spinning wireframe
///
/// Draws the built-in cube-and-box wireframe, turning half a revolution per
/// second. Q, Esc or Ctrl-C quits. Logging goes to stderr and is off unless
/// `RUST_LOG` is set; redirect stderr to keep it off the screen.

use wf3d_core::{Config, Mesh};
use wf3d_terminal::{AppError, TerminalApp};

fn main() -> Result<(), AppError> {
    env_logger::init();

    let mut app = TerminalApp::new(Mesh::reference(), Config::default())?;
    app.run()?;

    println!("Thank you for using WF3D Terminal Renderer!");
    Ok(())
}
