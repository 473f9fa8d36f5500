use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hand-gesture calculator", long_about = None)]
pub struct Args {
    /// Camera Index (default 0)
    #[arg(short, long, default_value_t = 0)]
    pub cam_index: u32,

    /// Hand landmark ONNX model (overrides tracking.model_path)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Mirror the camera output
    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    /// List available cameras
    #[arg(long)]
    pub list: bool,

    /// Use the scripted hand instead of the landmark model
    #[arg(long)]
    pub simulate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["rusty_hands"]);
        assert_eq!(args.cam_index, 0);
        assert_eq!(args.config, PathBuf::from("config.json"));
        assert!(args.model.is_none());
        assert!(!args.simulate);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "rusty_hands",
            "-c",
            "2",
            "--model",
            "hand.onnx",
            "--mirror",
            "--simulate",
        ]);
        assert_eq!(args.cam_index, 2);
        assert_eq!(args.model, Some(PathBuf::from("hand.onnx")));
        assert!(args.mirror);
        assert!(args.simulate);
    }
}
