//! Splitting argv on the `--` separator

/// Arguments on either side of the first `--`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    /// Utility flags (everything before the first `--`)
    pub pre: Vec<String>,
    /// Command to run (everything after the first `--`)
    pub post: Vec<String>,
}

/// Split a full argument vector (program name first) on the first `--`.
///
/// The program name is skipped and the separator itself is dropped. Any
/// later `--` is an ordinary element of the command.
pub fn split_args<I, S>(argv: I) -> SplitArgs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut split = SplitArgs::default();
    let mut separator_seen = false;

    for arg in argv.into_iter().skip(1).map(Into::into) {
        if !separator_seen && arg == "--" {
            separator_seen = true;
            continue;
        }

        if separator_seen {
            split.post.push(arg);
        } else {
            split.pre.push(arg);
        }
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_argv() {
        let split = split_args(Vec::<String>::new());
        assert!(split.pre.is_empty());
        assert!(split.post.is_empty());
    }

    #[test]
    fn test_program_name_only() {
        let split = split_args(["prog"]);
        assert_eq!(split, SplitArgs::default());
    }

    #[test]
    fn test_no_separator() {
        let split = split_args(["prog", "-path=/a", "-path=/b"]);
        assert_eq!(split.pre, strings(&["-path=/a", "-path=/b"]));
        assert!(split.post.is_empty());
    }

    #[test]
    fn test_single_separator() {
        let split = split_args(["prog", "-path=/a", "--", "env", "-i"]);
        assert_eq!(split.pre, strings(&["-path=/a"]));
        assert_eq!(split.post, strings(&["env", "-i"]));
    }

    #[test]
    fn test_only_first_separator_counts() {
        let split = split_args(["prog", "a", "--", "--", "b"]);
        assert_eq!(split.pre, strings(&["a"]));
        assert_eq!(split.post, strings(&["--", "b"]));
    }

    #[test]
    fn test_separator_first() {
        let split = split_args(["prog", "--", "ls"]);
        assert!(split.pre.is_empty());
        assert_eq!(split.post, strings(&["ls"]));
    }

    #[test]
    fn test_trailing_separator() {
        let split = split_args(["prog", "-path=/a", "--"]);
        assert_eq!(split.pre, strings(&["-path=/a"]));
        assert!(split.post.is_empty());
    }

    #[test]
    fn test_double_dash_prefix_is_not_separator() {
        let split = split_args(["prog", "--path=/a", "---", "x"]);
        assert_eq!(split.pre, strings(&["--path=/a", "---", "x"]));
        assert!(split.post.is_empty());
    }
}
