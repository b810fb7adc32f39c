use std::collections::HashMap;

/// One email template, addressed by code. Variables appear as `{{name}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub code: String,
    pub subject: String,
    pub body: String,
}

impl EmailTemplate {
    pub fn new(code: &str, subject: &str, body: &str) -> Self {
        Self {
            code: code.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    pub fn defaults() -> Vec<EmailTemplate> {
        vec![
            EmailTemplate::new(
                "member-joined",
                "Welcome to {{pod}}",
                "Hi {{name}},\n\nYou're in! You joined {{pod}} in position {{position}}.\n\
                 Contributions start once the pod locks.\n",
            ),
            EmailTemplate::new(
                "pod-locked",
                "{{pod}} is locked in",
                "Hi {{name}},\n\nThe payout order for {{pod}} is now fixed.\n\
                 You collect on {{payout_date}} ({{net}} after fees).\n",
            ),
            EmailTemplate::new(
                "payout-sent",
                "Your payout from {{pod}}",
                "Hi {{name}},\n\nYour payout of {{net}} from {{pod}} is on its way.\n",
            ),
            EmailTemplate::new(
                "contribution-received",
                "Contribution received",
                "Hi {{name}},\n\nWe received {{amount}} into {{pod}}.\n\
                 You're at {{progress}}% of your target.\n",
            ),
        ]
    }
}

/// Template store owned by the caller for the service's lifetime, with
/// explicit invalidation instead of ambient module-global state.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: HashMap<String, EmailTemplate>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut cache = Self::new();
        for template in EmailTemplate::defaults() {
            cache.insert(template);
        }
        cache
    }

    pub fn get(&self, code: &str) -> Option<&EmailTemplate> {
        self.templates.get(code)
    }

    pub fn insert(&mut self, template: EmailTemplate) {
        self.templates.insert(template.code.clone(), template);
    }

    /// Drop one template. Returns whether it was present.
    pub fn invalidate(&mut self, code: &str) -> bool {
        self.templates.remove(code).is_some()
    }

    pub fn clear(&mut self) {
        self.templates.clear();
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Substitute `{{name}}` variables. Unknown variables are left in place so
/// a missing value is visible rather than silently blank.
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    out
}

pub fn render_email(
    cache: &TemplateCache,
    code: &str,
    vars: &[(&str, String)],
) -> Option<RenderedEmail> {
    let template = cache.get(code)?;
    Some(RenderedEmail {
        subject: render(&template.subject, vars),
        body: render(&template.body, vars),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_variables() {
        let out = render("Hi {{name}}, welcome to {{pod}}", &[
            ("name", "Ada".to_string()),
            ("pod", "starter pod".to_string()),
        ]);
        assert_eq!(out, "Hi Ada, welcome to starter pod");
    }

    #[test]
    fn render_leaves_unknown_variables_visible() {
        let out = render("Hi {{name}}", &[]);
        assert_eq!(out, "Hi {{name}}");
    }

    #[test]
    fn cache_serves_defaults() {
        let cache = TemplateCache::with_defaults();
        assert!(cache.get("member-joined").is_some());
        assert!(cache.get("pod-locked").is_some());
        assert!(cache.get("nope").is_none());
    }

    #[test]
    fn invalidate_removes_one_template() {
        let mut cache = TemplateCache::with_defaults();
        let before = cache.len();
        assert!(cache.invalidate("payout-sent"));
        assert!(!cache.invalidate("payout-sent"));
        assert_eq!(cache.len(), before - 1);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = TemplateCache::with_defaults();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn render_email_uses_both_parts() {
        let cache = TemplateCache::with_defaults();
        let email = render_email(
            &cache,
            "payout-sent",
            &[
                ("name", "Ada".to_string()),
                ("net", "29250.00".to_string()),
                ("pod", "starter pod".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(email.subject, "Your payout from starter pod");
        assert!(email.body.contains("29250.00"));
    }
}
