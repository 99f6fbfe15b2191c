//! Resource path conventions.

/// How a collection lays out its CRUD endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStyle {
    /// `{r}?page=&size=`, `{r}/{id}`, `POST {r}`, `PUT {r}/{id}`, `DELETE {r}/{id}`
    Uniform,
    /// `{r}/all?page=&size=`, `{r}/find/{id}`, `{r}/create`,
    /// `{r}/update/{id}`, `{r}/delete/{id}`
    ActionSegments,
}

/// A named REST collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Path segment under the API root, e.g. `owners`
    pub name: &'static str,
    /// Display name for lists and messages
    pub label: &'static str,
    pub routes: RouteStyle,
    /// Other names accepted by [`crate::lookup`]
    pub aliases: &'static [&'static str],
}

impl ResourceSpec {
    pub const fn uniform(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            routes: RouteStyle::Uniform,
            aliases: &[],
        }
    }

    pub const fn action_segments(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            routes: RouteStyle::ActionSegments,
            aliases: &[],
        }
    }

    pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    pub fn list_path(&self, page: u32, size: u32) -> String {
        match self.routes {
            RouteStyle::Uniform => format!("{}?page={}&size={}", self.name, page, size),
            RouteStyle::ActionSegments => format!("{}/all?page={}&size={}", self.name, page, size),
        }
    }

    pub fn item_path(&self, id: i64) -> String {
        match self.routes {
            RouteStyle::Uniform => format!("{}/{}", self.name, id),
            RouteStyle::ActionSegments => format!("{}/find/{}", self.name, id),
        }
    }

    pub fn create_path(&self) -> String {
        match self.routes {
            RouteStyle::Uniform => self.name.to_string(),
            RouteStyle::ActionSegments => format!("{}/create", self.name),
        }
    }

    pub fn update_path(&self, id: i64) -> String {
        match self.routes {
            RouteStyle::Uniform => format!("{}/{}", self.name, id),
            RouteStyle::ActionSegments => format!("{}/update/{}", self.name, id),
        }
    }

    pub fn delete_path(&self, id: i64) -> String {
        match self.routes {
            RouteStyle::Uniform => format!("{}/{}", self.name, id),
            RouteStyle::ActionSegments => format!("{}/delete/{}", self.name, id),
        }
    }

    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_paths() {
        let owners = ResourceSpec::uniform("owners", "Owners");
        assert_eq!(owners.list_path(0, 10), "owners?page=0&size=10");
        assert_eq!(owners.item_path(5), "owners/5");
        assert_eq!(owners.create_path(), "owners");
        assert_eq!(owners.update_path(5), "owners/5");
        assert_eq!(owners.delete_path(5), "owners/5");
    }

    #[test]
    fn test_action_segment_paths() {
        let diagnosis = ResourceSpec::action_segments("diagnosis", "Diagnoses");
        assert_eq!(diagnosis.list_path(1, 20), "diagnosis/all?page=1&size=20");
        assert_eq!(diagnosis.item_path(3), "diagnosis/find/3");
        assert_eq!(diagnosis.create_path(), "diagnosis/create");
        assert_eq!(diagnosis.update_path(3), "diagnosis/update/3");
        assert_eq!(diagnosis.delete_path(3), "diagnosis/delete/3");
    }

    #[test]
    fn test_answers_to_name_and_aliases() {
        let spec = ResourceSpec::uniform("bloodTypes", "Blood types").with_aliases(&["blood-types"]);
        assert!(spec.answers_to("bloodTypes"));
        assert!(spec.answers_to("BLOODTYPES"));
        assert!(spec.answers_to("blood-types"));
        assert!(!spec.answers_to("blood"));
    }
}
