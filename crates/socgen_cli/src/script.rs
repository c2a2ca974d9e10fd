//! `socgen script`: print the generated script without touching the file system.

use socgen_bd::assemble;

use crate::pipeline::prepare;
use crate::{DesignArgs, GlobalArgs};

/// Runs the `socgen script` command.
///
/// Source paths are shown relocated into the output directory, exactly as
/// `socgen build` would write them.
pub fn run(args: &DesignArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (tool, mut design) = prepare(global, &args.design)?;
    design.relocate();
    let assembly = assemble(&design, &tool)?;
    print!("{}", assembly.script);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::fixture;

    #[test]
    fn script_leaves_file_system_alone() {
        let fx = fixture("");
        assert_eq!(run(&DesignArgs { design: fx.design.clone() }, &fx.global).unwrap(), 0);
        assert!(!fx.out_dir().exists());
    }
}
