use std::process::ExitCode;

fn main() -> ExitCode {
    game_save_backup::run()
}
