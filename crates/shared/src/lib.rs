use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта сцены (uuid v4 в текстовом виде)
pub type ObjectId = String;

/// Тип редактируемого объекта сцены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Загруженная модель (путь к файлу хранится в params)
    Model,
    /// Пустой узел-группа
    Empty,
    /// Источник света
    Light,
    /// Камера
    Camera,
    /// Коллизионное тело (размеры хранятся в params)
    Collision,
    /// Физический узел
    Physics,
}

impl ObjectKind {
    /// Человекочитаемое имя для дерева сцены
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Model => "Model",
            ObjectKind::Empty => "Empty",
            ObjectKind::Light => "Light",
            ObjectKind::Camera => "Camera",
            ObjectKind::Collision => "Collision",
            ObjectKind::Physics => "Physics",
        }
    }
}

/// Трансформация объекта относительно родителя
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    /// Heading / pitch / roll в градусах
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

fn default_true() -> bool {
    true
}

fn default_project_version() -> u32 {
    1
}

/// Запись об объекте в файле проекта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    /// Родитель; None = корень сцены
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectId>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Параметры, специфичные для типа объекта. Ядро редактора их не интерпретирует.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

/// Снимок проекта: живые объекты, родители раньше детей
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default = "default_project_version")]
    pub project_version: u32,
    #[serde(default)]
    pub objects: Vec<ObjectEntry>,
}

impl Default for ProjectFile {
    fn default() -> Self {
        Self {
            project_version: default_project_version(),
            objects: Vec::new(),
        }
    }
}

impl ProjectFile {
    /// Найти объект по ID
    pub fn find(&self, id: &str) -> Option<&ObjectEntry> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Прямые потомки объекта (или корня сцены при None)
    pub fn children_of<'a>(&'a self, parent: Option<&'a str>) -> impl Iterator<Item = &'a ObjectEntry> {
        self.objects
            .iter()
            .filter(move |o| o.parent.as_deref() == parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ObjectKind::Collision).unwrap();
        assert_eq!(json, r#""collision""#);
        let back: ObjectKind = serde_json::from_str(r#""physics""#).unwrap();
        assert_eq!(back, ObjectKind::Physics);
    }

    #[test]
    fn test_transform_default_has_unit_scale() {
        let t = Transform::default();
        assert_eq!(t.scale, [1.0, 1.0, 1.0]);
        assert_eq!(t.position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_entry_defaults_when_fields_missing() {
        let json = r#"{"id": "a", "name": "Lamp", "kind": "light"}"#;
        let entry: ObjectEntry = serde_json::from_str(json).unwrap();
        assert!(entry.visible);
        assert!(entry.parent.is_none());
        assert!(entry.params.is_null());
        assert_eq!(entry.transform, Transform::new());
    }

    #[test]
    fn test_entry_skips_empty_optional_fields() {
        let entry = ObjectEntry {
            id: "a".into(),
            name: "Box".into(),
            kind: ObjectKind::Model,
            parent: None,
            transform: Transform::new(),
            visible: true,
            params: serde_json::Value::Null,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("parent"));
        assert!(!json.contains("params"));
    }

    #[test]
    fn test_params_are_preserved_opaquely() {
        let json = r#"{"id": "c", "name": "Col", "kind": "collision",
            "params": {"collision_solid_type": "box", "dims": [1, 2, 3]}}"#;
        let entry: ObjectEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.params["collision_solid_type"], "box");
        assert_eq!(entry.params["dims"][2], 3);
    }

    #[test]
    fn test_project_children_of() {
        let project: ProjectFile = serde_json::from_str(
            r#"{"objects": [
                {"id": "a", "name": "A", "kind": "empty"},
                {"id": "b", "name": "B", "kind": "model", "parent": "a"},
                {"id": "c", "name": "C", "kind": "model"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(project.project_version, 1);
        let roots: Vec<_> = project.children_of(None).map(|o| o.id.as_str()).collect();
        assert_eq!(roots, vec!["a", "c"]);
        let under_a: Vec<_> = project.children_of(Some("a")).map(|o| o.id.as_str()).collect();
        assert_eq!(under_a, vec!["b"]);
        assert!(project.find("b").is_some());
        assert!(project.find("zz").is_none());
    }
}
