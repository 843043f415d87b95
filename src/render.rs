//! Management page markup. One page, rebuilt in full on every request.

/// Splits a stored attendance value into its ordered timestamp lines.
pub fn split_log(value: &str) -> Vec<&str> {
    value.split('\n').collect()
}

pub fn index(registry: &[(String, String)], attendance: &[(String, String)]) -> String {
    let mut page = String::from(
        "<!doctype html>\n<html>\n<head><title>Tag registry</title></head>\n<body>\n\
         <h1>Tag registry</h1>\n\
         <form method=\"post\">\n\
         <input name=\"key\" placeholder=\"tag uid\">\n\
         <input name=\"value\" placeholder=\"label\">\n\
         <button name=\"add\" value=\"1\">Add</button>\n\
         <button name=\"delete\" value=\"1\">Delete</button>\n\
         </form>\n\
         <table>\n<tr><th>Tag</th><th>Label</th></tr>\n",
    );

    for (tag_id, label) in registry {
        page.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(tag_id),
            escape(label)
        ));
    }
    page.push_str("</table>\n<h1>Attendance</h1>\n");

    for (key, log) in attendance {
        page.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape(key)));
        for stamp in split_log(log) {
            page.push_str(&format!("<li>{}</li>\n", escape(stamp)));
        }
        page.push_str("</ul>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::{escape, index, split_log};

    #[test]
    fn log_splits_into_ordered_lines() {
        assert_eq!(split_log("t1\nt2\nt3"), vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn single_line_log_is_one_entry() {
        assert_eq!(split_log("t1"), vec!["t1"]);
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(escape("<b>&\"</b>"), "&lt;b&gt;&amp;&quot;&lt;/b&gt;");
    }

    #[test]
    fn page_lists_registry_and_attendance() {
        let registry = vec![("04A1B2C3".to_string(), "alice".to_string())];
        let attendance = vec![("alice".to_string(), "t1\nt2".to_string())];

        let page = index(&registry, &attendance);

        assert!(page.contains("<td>04A1B2C3</td><td>alice</td>"));
        assert!(page.contains("<h2>alice</h2>"));
        assert!(page.contains("<li>t1</li>"));
        assert!(page.contains("<li>t2</li>"));
    }

    #[test]
    fn empty_store_still_renders_the_form() {
        let page = index(&[], &[]);

        assert!(page.contains("<form method=\"post\">"));
        assert!(page.contains("name=\"add\""));
        assert!(page.contains("name=\"delete\""));
    }
}
