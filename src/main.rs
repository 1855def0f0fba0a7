use datalayers::cli::{is_internal, run};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        if is_internal(&e) {
            eprintln!("Internal error: {}", e);
            // Show error chain if available
            let mut causes = e.chain().skip(1).peekable();
            if causes.peek().is_some() {
                eprintln!("\nCaused by:");
                for (indent, cause) in causes.enumerate() {
                    eprintln!("{:indent$}  {}", "", cause, indent = indent + 1);
                }
            }
            std::process::exit(2);
        } else {
            // User error
            eprintln!("Error: {}", e);
            let mut causes = e.chain().skip(1).peekable();
            if causes.peek().is_some() {
                for cause in causes {
                    eprintln!("  {}", cause);
                }
            }
            std::process::exit(1);
        }
    }
}
