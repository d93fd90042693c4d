//! 3D file fixture writer.
//!
//! Emits the item stream of any format version from a few high-level
//! calls, so the same survey can be written in every dialect. Labels are
//! always full dotted names: legacy dialects reset the label buffer before
//! each one, version 8 deletes the previous label and adds the new one.

#![allow(dead_code)]

/// A raw coordinate triple in centimetres.
pub type Point = [i32; 3];

pub struct FixtureWriter {
    version: u32,
    title: String,
    file_flags: u8,
    body: Vec<u8>,
    label: String,
}

impl FixtureWriter {
    pub fn new(version: u32) -> Self {
        let mut writer = Self {
            version,
            title: "fixture".to_string(),
            file_flags: 0,
            body: Vec::new(),
            label: String::new(),
        };
        if writer.is_tagged() {
            // first STYLE sets the normal style
            writer.body.push(0x00);
        }
        writer
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn file_flags(mut self, flags: u8) -> Self {
        self.file_flags = flags;
        self
    }

    fn is_tagged(&self) -> bool {
        self.version >= 8
    }

    fn xyz(&mut self, at: Point) {
        for v in at {
            self.body.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn label_field(&mut self, name: &str) {
        if self.is_tagged() {
            let delete = self.label.len();
            let add = name.len();
            if delete <= 15 && add <= 15 && (delete, add) != (0, 0) {
                self.body.push(((delete as u8) << 4) | add as u8);
            } else {
                self.body.extend_from_slice(&[0x00, delete as u8, add as u8]);
            }
        } else {
            self.body.push(name.len() as u8);
        }
        self.body.extend_from_slice(name.as_bytes());
        self.label = name.to_string();
    }

    /// Reset the legacy label buffer so the next field starts from empty.
    fn legacy_reset(&mut self) {
        if !self.is_tagged() && !self.label.is_empty() {
            self.body.push(0x00);
            self.label.clear();
        }
    }

    pub fn move_to(&mut self, at: Point) -> &mut Self {
        self.body.push(0x0F);
        self.xyz(at);
        self
    }

    /// A leg from the current point, recorded in `survey`.
    pub fn line_to(&mut self, survey: &str, at: Point, flags: u8) -> &mut Self {
        self.legacy_reset();
        let base = if self.is_tagged() { 0x40 } else { 0x80 };
        self.body.push(base | flags);
        self.label_field(survey);
        self.xyz(at);
        self
    }

    /// A leg without a label field (version 8 only).
    pub fn line_to_same_label(&mut self, at: Point, flags: u8) -> &mut Self {
        assert!(self.is_tagged(), "unlabelled LINE needs version 8");
        self.body.push(0x40 | 0x20 | flags);
        self.xyz(at);
        self
    }

    pub fn label(&mut self, name: &str, at: Point, flags: u8) -> &mut Self {
        self.legacy_reset();
        let base = if self.is_tagged() { 0x80 } else { 0x40 };
        self.body.push(base | flags);
        self.label_field(name);
        self.xyz(at);
        self
    }

    /// Date in days since 1900 (versions 7 and 8).
    pub fn date_days(&mut self, days: u16) -> &mut Self {
        let code = if self.is_tagged() { 0x11 } else { 0x20 };
        self.body.push(code);
        self.body.extend_from_slice(&days.to_le_bytes());
        self
    }

    /// Arbitrary item bytes.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn preamble(&self) -> Vec<u8> {
        let mut data = format!("Survex 3D Image File\nv{}\n{}\n@0\n", self.version, self.title).into_bytes();
        if self.is_tagged() {
            data.push(self.file_flags);
        }
        data
    }

    /// The complete file, end marker included.
    pub fn finish(&self) -> Vec<u8> {
        let mut data = self.preamble();
        data.extend_from_slice(&self.body);
        data.push(0x00);
        data
    }
}

/// One survey `cave`, stations `cave.1` and `cave.2`, one leg between them.
pub fn minimal_fixture(version: u32) -> Vec<u8> {
    let mut w = FixtureWriter::new(version);
    w.move_to([0, 0, 0])
        .line_to("cave", [1000, 500, -250], 0)
        .label("cave.1", [0, 0, 0], 0x02)
        .label("cave.2", [1000, 500, -250], 0x02);
    w.finish()
}

/// A small two-survey system: `sys.a` is a three-station passage with a
/// splay, `sys.b` hangs off its last station.
pub fn two_survey_fixture(version: u32) -> Vec<u8> {
    let mut w = FixtureWriter::new(version);
    w.move_to([0, 0, 0])
        .line_to("sys.a", [1000, 0, 0], 0)
        .line_to("sys.a", [2500, 0, -100], 0)
        .move_to([1000, 0, 0])
        .line_to("sys.a", [1000, 150, 0], 0x04)
        .move_to([2500, 0, -100])
        .line_to("sys.b", [2500, 800, -300], 0)
        .label("sys.a.1", [0, 0, 0], 0x06)
        .label("sys.a.2", [1000, 0, 0], 0x02)
        .label("sys.a.3", [2500, 0, -100], 0x02)
        .label("sys.a.s1", [1000, 150, 0], 0x02)
        .label("sys.b.1", [2500, 800, -300], 0x02);
    w.finish()
}

/// Two surveys joined by an equate: `sys.a.2` and `sys.b.0` share a position.
pub fn equated_fixture(version: u32) -> Vec<u8> {
    let mut w = FixtureWriter::new(version);
    w.move_to([0, 0, 0])
        .line_to("sys.a", [1000, 0, 0], 0)
        .move_to([1000, 0, 0])
        .line_to("sys.b", [1000, 500, 0], 0)
        .label("sys.a.1", [0, 0, 0], 0x02)
        .label("sys.a.2", [1000, 0, 0], 0x02)
        .label("sys.b.0", [1000, 0, 0], 0x02)
        .label("sys.b.1", [1000, 500, 0], 0x02);
    w.finish()
}
