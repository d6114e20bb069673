//! Filename sanitization

/// Make a submitted filename safe to store.
///
/// Lowercases ASCII letters, replaces every character outside `[a-z0-9-.]` with `-`
/// and collapses runs of `-` into one. The result is stable under repeated
/// application.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.' {
            c
        } else {
            '-'
        };

        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_examples() {
        assert_eq!(sanitize_filename("My Photo!!.JPG"), "my-photo-.jpg");
        assert_eq!(sanitize_filename("report_2024 (final).pdf"), "report-2024-final-.pdf");
        assert_eq!(sanitize_filename("a---b"), "a-b");
        assert_eq!(sanitize_filename("already-clean.png"), "already-clean.png");
        assert_eq!(sanitize_filename("Ünïcödé.txt"), "-n-c-d-.txt");
        assert_eq!(sanitize_filename("../../etc/passwd"), "..-..-etc-passwd");
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "My Photo!!.JPG",
            "--x--",
            "Ünïcödé  file.tar.gz",
            "C:\\Users\\me\\Desktop\\cat.png",
            "tab\tand\nnewline",
            "",
            "日本語.png",
        ];

        for input in inputs {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_sanitize_output_charset() {
        let inputs = ["A  B!!C??D", "x@@@y###z", "ñ-ñ-ñ", "$$$"];

        for input in inputs {
            let out = sanitize_filename(input);
            assert!(!out.contains("--"), "{out:?} has a dash run");
            assert!(
                out.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.'),
                "{out:?} has a disallowed character"
            );
        }
    }
}
