#[cfg(test)]
mod test {
    use assert_cmd::prelude::*;
    use predicates::prelude::*;
    use std::process::Command;

    #[test]
    fn query_flag_runs_a_scripted_session_non_interactively() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("mvcc-cli")?;

        cmd.arg("--non-interactive").arg("--query=begin\nset a 1\nget a\ncommit\n");
        cmd.assert().success().stdout(predicate::str::contains("1"));

        Ok(())
    }

    #[test]
    fn unrecognized_flag_fails_with_a_usage_error() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("mvcc-cli")?;

        cmd.arg("--not-a-real-flag");
        cmd.assert().failure().stderr(predicate::str::contains("unexpected argument"));

        Ok(())
    }

    #[test]
    fn a_missing_key_reports_not_available() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("mvcc-cli")?;

        cmd.arg("--non-interactive").arg("--query=begin\nget never-set\n");
        cmd.assert().success().stdout(predicate::str::contains("N/A"));

        Ok(())
    }
}
