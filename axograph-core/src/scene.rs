/// Scene CSV files: one row per point, view settings on the first row
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;
use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, none_of},
    combinator::{all_consuming, map, map_res, value},
    multi::{fold_many0, separated_list1},
    number::complete::double,
    sequence::delimited,
    IResult,
};

use crate::axis::AxisAngles;
use crate::error::{Error, Result};
use crate::registry::{PointId, Registry};

const NO: &str = "no";
const CONNECTIONS: &str = "connections";
const X: &str = "x";
const Y: &str = "y";
const Z: &str = "z";
const X_ANGLE: &str = "x axes angle";
const Y_ANGLE: &str = "y axes angle";
const Z_ANGLE: &str = "z axes angle";
const MAX_VALUE: &str = "maximum value";

const HEADER: [&str; 9] = [
    NO,
    CONNECTIONS,
    X,
    Y,
    Z,
    X_ANGLE,
    Y_ANGLE,
    Z_ANGLE,
    MAX_VALUE,
];

/// Separator between partner numbers in the connections column
const PARTNER_SEPARATOR: &str = "-";

/// Everything a scene file stores
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub max_value: i32,
    pub angles: AxisAngles,
    pub positions: Vec<Point3<i32>>,
    /// Zero-based index pairs, lower index first
    pub connections: Vec<(PointId, PointId)>,
}

impl Scene {
    pub fn from_registry(registry: &Registry, angles: AxisAngles, max_value: i32) -> Self {
        Self {
            max_value,
            angles,
            positions: registry.points().iter().map(|p| p.position).collect(),
            connections: registry
                .connections()
                .iter()
                .map(|c| c.endpoints())
                .collect(),
        }
    }

    /// Render as CSV. Each row lists only the partners numbered above it,
    /// so every connection is written once.
    pub fn to_csv(&self) -> String {
        let mut partners = vec![Vec::new(); self.positions.len()];
        for &(a, b) in &self.connections {
            let (low, high) = if a < b { (a, b) } else { (b, a) };
            if low != high && high < partners.len() {
                partners[low].push((high + 1).to_string());
            }
        }

        let mut out = HEADER.join(",");
        out.push('\n');
        for (n, (position, partners)) in self.positions.iter().zip(&partners).enumerate() {
            let view = if n == 0 {
                format!(
                    "{},{},{},{}",
                    self.angles.x, self.angles.y, self.angles.z, self.max_value
                )
            } else {
                ",,,".to_string()
            };
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                n + 1,
                partners.join(PARTNER_SEPARATOR),
                position.x,
                position.y,
                position.z,
                view
            ));
        }
        out
    }

    /// Parse a scene file. Columns are found by header name; connection
    /// references that are out of range, self-referencing, or repeated are
    /// dropped.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| parse_record(line, n + 1).map(|cells| (n + 1, cells)));

        let (_, header) = lines.next().ok_or(Error::EmptyScene)??;
        let columns = Columns::locate(&header)?;
        let rows = lines.collect::<Result<Vec<_>>>()?;
        let (first_line, first) = rows.first().ok_or(Error::EmptyScene)?;

        let max_value = columns.number(first, MAX_VALUE, *first_line)?;
        let angles = AxisAngles::new(
            columns.number(first, X_ANGLE, *first_line)?,
            columns.number(first, Y_ANGLE, *first_line)?,
            columns.number(first, Z_ANGLE, *first_line)?,
        );

        let mut positions = Vec::with_capacity(rows.len());
        let mut references = Vec::with_capacity(rows.len());
        for (line, cells) in &rows {
            positions.push(Point3::new(
                columns.number(cells, X, *line)?,
                columns.number(cells, Y, *line)?,
                columns.number(cells, Z, *line)?,
            ));
            references.push(parse_partners(columns.cell(cells, CONNECTIONS), *line)?);
        }

        let mut connections: Vec<(PointId, PointId)> = Vec::new();
        for (n, partners) in references.into_iter().enumerate() {
            for reference in partners {
                let Some(partner) = reference.checked_sub(1) else {
                    continue;
                };
                if partner == n || partner >= positions.len() {
                    continue;
                }
                let pair = (n.min(partner), n.max(partner));
                if !connections.contains(&pair) {
                    connections.push(pair);
                }
            }
        }

        Ok(Self {
            max_value,
            angles,
            positions,
            connections,
        })
    }
}

/// Column positions resolved from the header row
struct Columns {
    names: Vec<String>,
}

impl Columns {
    fn locate(header: &[String]) -> Result<Self> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        for &required in HEADER.iter().filter(|&&name| name != NO) {
            if !names.iter().any(|n| n == required) {
                return Err(Error::MissingColumn(required));
            }
        }
        Ok(Self { names })
    }

    fn cell<'a>(&self, cells: &'a [String], name: &str) -> &'a str {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| cells.get(i))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }

    fn number(&self, cells: &[String], name: &str, line: usize) -> Result<i32> {
        let cell = self.cell(cells, name);
        let parsed: IResult<&str, f64> = all_consuming(double)(cell);
        match parsed {
            Ok((_, number)) if number.is_finite() => {
                let rounded = number.round();
                if rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
                    return Err(Error::Parse {
                        line,
                        message: format!("\"{name}\" value {cell} is out of range"),
                    });
                }
                Ok(rounded as i32)
            }
            _ => Err(Error::Parse {
                line,
                message: format!("expected a number in \"{name}\", found {cell:?}"),
            }),
        }
    }
}

fn parse_record(text: &str, line: usize) -> Result<Vec<String>> {
    all_consuming(record)(text)
        .map(|(_, cells)| cells)
        .map_err(|e| Error::Parse {
            line,
            message: format!("malformed row {text:?}: {e:?}"),
        })
}

fn parse_partners(cell: &str, line: usize) -> Result<Vec<usize>> {
    if cell.is_empty() {
        return Ok(Vec::new());
    }
    let parsed: IResult<&str, Vec<usize>> = all_consuming(separated_list1(
        tag(PARTNER_SEPARATOR),
        map_res(digit1, str::parse::<usize>),
    ))(cell);
    parsed.map(|(_, partners)| partners).map_err(|_| Error::Parse {
        line,
        message: format!("malformed connections {cell:?}"),
    })
}

fn record(input: &str) -> IResult<&str, Vec<String>> {
    separated_list1(char(','), field)(input)
}

fn field(input: &str) -> IResult<&str, String> {
    alt((quoted_field, bare_field))(input)
}

fn quoted_field(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        fold_many0(
            alt((value('"', tag("\"\"")), none_of("\""))),
            String::new,
            |mut s, c| {
                s.push(c);
                s
            },
        ),
        char('"'),
    )(input)
}

fn bare_field(input: &str) -> IResult<&str, String> {
    map(take_while(|c| c != ','), str::to_string)(input)
}

/// Input and output directories for scene files
#[derive(Debug, Clone)]
pub struct SceneStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
    cursor: Option<usize>,
}

impl SceneStore {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            cursor: None,
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Files available for loading, by file name. A missing directory has
    /// no files.
    pub fn input_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.input_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load the file after the previously loaded one, wrapping around.
    pub fn load_next(&mut self) -> Result<(PathBuf, Scene)> {
        let files = self.input_files()?;
        if files.is_empty() {
            return Err(Error::NoInputFiles(self.input_dir.clone()));
        }
        let index = self.cursor.map_or(0, |c| (c + 1) % files.len());
        self.cursor = Some(index);

        let path = files[index].clone();
        let scene = Scene::from_csv(&fs::read_to_string(&path)?)?;
        info!(
            "loaded {} ({} points, {} connections)",
            path.display(),
            scene.positions.len(),
            scene.connections.len()
        );
        Ok((path, scene))
    }

    /// Start the load cycle from the first file again.
    pub fn rewind(&mut self) {
        self.cursor = None;
    }

    /// First `output_<n>.csv` not yet present
    pub fn next_output_path(&self) -> PathBuf {
        (1..)
            .map(|n| self.output_dir.join(format!("output_{n}.csv")))
            .find(|path| !path.exists())
            .unwrap_or_else(|| self.output_dir.join("output.csv"))
    }

    pub fn save(&self, scene: &Scene) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.next_output_path();
        fs::write(&path, scene.to_csv())?;
        info!("saved {} points to {}", scene.positions.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Scene {
        Scene {
            max_value: 8,
            angles: AxisAngles::new(330, 90, 210),
            positions: vec![Point3::new(1, 2, 3), Point3::new(-8, 0, 8), Point3::new(0, 0, -1)],
            connections: vec![(0, 1), (1, 2), (0, 2)],
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = triangle().to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "no,connections,x,y,z,x axes angle,y axes angle,z axes angle,maximum value"
        );
        assert_eq!(lines[1], "1,2-3,1,2,3,330,90,210,8");
        assert_eq!(lines[2], "2,3,-8,0,8,,,,");
        assert_eq!(lines[3], "3,,0,0,-1,,,,");
    }

    #[test]
    fn test_export_then_import_is_identity() {
        let scene = triangle();
        let parsed = Scene::from_csv(&scene.to_csv()).unwrap();
        assert_eq!(parsed.max_value, scene.max_value);
        assert_eq!(parsed.angles, scene.angles);
        assert_eq!(parsed.positions, scene.positions);
        let mut expected = scene.connections.clone();
        let mut actual = parsed.connections.clone();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_import_skips_bad_references() {
        let csv = "no,connections,x,y,z,x axes angle,y axes angle,z axes angle,maximum value\n\
                   1,1-2-9-0,0,0,0,0,90,210,4\n\
                   2,1,1,1,1,,,,\n";
        let scene = Scene::from_csv(csv).unwrap();
        assert_eq!(scene.connections, vec![(0, 1)]);
    }

    #[test]
    fn test_import_accepts_reordered_quoted_and_float_columns() {
        let csv = "maximum value,x,y,z,connections,x axes angle,y axes angle,z axes angle\r\n\
                   12.0,\"3\",-2,1.0,\"2\",45.0,90,180\r\n\
                   \r\n\
                   ,0,0,0,,,,\r\n";
        let scene = Scene::from_csv(csv).unwrap();
        assert_eq!(scene.max_value, 12);
        assert_eq!(scene.angles, AxisAngles::new(45, 90, 180));
        assert_eq!(scene.positions, vec![Point3::new(3, -2, 1), Point3::origin()]);
        assert_eq!(scene.connections, vec![(0, 1)]);
    }

    #[test]
    fn test_import_errors() {
        assert!(matches!(Scene::from_csv(""), Err(Error::EmptyScene)));
        assert!(matches!(
            Scene::from_csv("no,connections,x,y,z\n1,,0,0,0\n"),
            Err(Error::MissingColumn(X_ANGLE))
        ));
        let header = HEADER.join(",");
        assert!(matches!(Scene::from_csv(&header), Err(Error::EmptyScene)));
        assert!(matches!(
            Scene::from_csv(&format!("{header}\n1,,a,0,0,0,90,210,4\n")),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            Scene::from_csv(&format!("{header}\n1,2+3,0,0,0,0,90,210,4\n")),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_import_rejects_out_of_range_numbers() {
        let header = HEADER.join(",");
        assert!(matches!(
            Scene::from_csv(&format!("{header}\n1,,0,0,0,330,90,210,-1e12\n")),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            Scene::from_csv(&format!("{header}\n1,,0,0,0,330,90,210,4\n2,,0,3e9,0,,,,\n")),
            Err(Error::Parse { line: 3, .. })
        ));
        let scene = Scene::from_csv(&format!("{header}\n1,,-2147483648,0,0,330,90,210,4\n")).unwrap();
        assert_eq!(scene.positions, vec![Point3::new(i32::MIN, 0, 0)]);
    }

    #[test]
    fn test_save_picks_first_free_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = SceneStore::new(dir.path().join("in"), dir.path().join("out"));
        let first = store.save(&triangle()).unwrap();
        assert_eq!(first.file_name().unwrap(), "output_1.csv");
        let second = store.save(&triangle()).unwrap();
        assert_eq!(second.file_name().unwrap(), "output_2.csv");

        fs::remove_file(&first).unwrap();
        assert_eq!(store.next_output_path(), first);
    }

    #[test]
    fn test_load_cycles_through_inputs() {
        let scratch = tempfile::tempdir().unwrap();
        let dir = scratch.path();
        let mut a = triangle();
        a.max_value = 4;
        let mut b = triangle();
        b.max_value = 12;
        fs::write(dir.join("a.csv"), a.to_csv()).unwrap();
        fs::write(dir.join("b.csv"), b.to_csv()).unwrap();

        let mut store = SceneStore::new(dir, dir.join("out"));
        let loaded: Vec<i32> = (0..3).map(|_| store.load_next().unwrap().1.max_value).collect();
        assert_eq!(loaded, vec![4, 12, 4]);

        store.rewind();
        assert_eq!(store.load_next().unwrap().1.max_value, 4);
    }

    #[test]
    fn test_missing_input_dir_has_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SceneStore::new(dir.path().join("nowhere"), dir.path().join("out"));
        assert!(store.input_files().unwrap().is_empty());
        assert!(matches!(store.load_next(), Err(Error::NoInputFiles(_))));
    }
}
