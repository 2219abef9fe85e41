pub(super) const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS templates (
    id                TEXT PRIMARY KEY,
    image_path        TEXT NOT NULL,
    original_filename TEXT
);

CREATE TABLE IF NOT EXISTS text_elements (
    template_id TEXT    NOT NULL REFERENCES templates(id),
    position    INTEGER NOT NULL,
    type        TEXT    NOT NULL,
    text        TEXT    NOT NULL,
    font_size   INTEGER NOT NULL,
    color       TEXT    NOT NULL,
    x           INTEGER NOT NULL,
    y           INTEGER NOT NULL,
    PRIMARY KEY (template_id, position)
);
";
