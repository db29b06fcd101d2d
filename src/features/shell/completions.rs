//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::DocketError;

/// Generate the completion script for `shell`.
pub fn generate_completions(shell: Shell) -> Result<String, DocketError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "docket", &mut buf);
    String::from_utf8(buf).map_err(|e| DocketError::Parse(format!("UTF-8 error: {e}")))
}

/// How to install the completion script for `shell`.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => "# Add to ~/.bashrc:\nsource <(docket completions bash)\n",
        Shell::Zsh => {
            "# Save to your fpath, then run compinit:\ndocket completions zsh > ~/.zsh/completions/_docket\n"
        }
        Shell::Fish => "docket completions fish > ~/.config/fish/completions/docket.fish\n",
        Shell::PowerShell => {
            "# Add to $PROFILE:\ndocket completions powershell | Out-String | Invoke-Expression\n"
        }
        _ => "# Save the script where your shell loads completions from\n",
    }
}
