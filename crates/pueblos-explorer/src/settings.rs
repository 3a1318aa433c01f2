use clap::Parser;
use pueblos_lib::FieldMapping;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Pueblos Explorer - Filter a map dataset of indigenous communities from the command line
pub struct Settings {
    /// GeoJSON files to load (features are concatenated in this order)
    #[clap(short, long = "geojson", value_name = "FILE", required = true)]
    pub geojson_files: Vec<PathBuf>,

    /// Facet edits applied in order, e.g. `--edit pueblo=Zapoteco --edit state=Oaxaca`.
    /// An empty value (`state=`) clears the facet
    #[clap(short, long = "edit", value_name = "FACET=VALUE")]
    pub edits: Vec<String>,

    /// Property holding the state name
    #[clap(long, default_value = "NOM_ENT")]
    pub state_field: String,

    /// Property holding the municipality name
    #[clap(long, default_value = "NOM_MUN")]
    pub municipality_field: String,

    /// Property holding the community name
    #[clap(long, default_value = "NOM_COM")]
    pub community_field: String,

    /// Property holding the locality name (used when the community is blank)
    #[clap(long, default_value = "NOM_LOC")]
    pub locality_field: String,

    /// Property holding the people ("pueblo")
    #[clap(long, default_value = "PUEBLO")]
    pub people_field: String,

    /// Property holding the record id used for de-duplication
    #[clap(long, default_value = "ID")]
    pub id_field: String,

    /// Print the report as JSON instead of text
    #[clap(long, default_value = "false")]
    pub json: bool,

    /// Maximum options listed per facet in the text report (0 = all)
    #[clap(long, default_value = "15")]
    pub max_options: usize,
}

impl Settings {
    /// Property mapping for the loader
    pub fn field_mapping(&self) -> FieldMapping {
        FieldMapping {
            state: self.state_field.clone(),
            municipality: self.municipality_field.clone(),
            community: self.community_field.clone(),
            locality: self.locality_field.clone(),
            people: self.people_field.clone(),
            record_id: self.id_field.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library_mapping() {
        let settings = Settings::parse_from(["pueblos-explorer", "--geojson", "data.geojson"]);
        assert_eq!(settings.field_mapping(), FieldMapping::default());
        assert!(settings.edits.is_empty());
        assert!(!settings.json);
    }

    #[test]
    fn test_edits_keep_order() {
        let settings = Settings::parse_from([
            "pueblos-explorer",
            "-g",
            "a.geojson",
            "-g",
            "b.geojson",
            "--edit",
            "pueblo=Tzotzil",
            "-e",
            "state=Oaxaca",
        ]);
        assert_eq!(settings.geojson_files.len(), 2);
        assert_eq!(settings.edits, vec!["pueblo=Tzotzil", "state=Oaxaca"]);
    }

    #[test]
    fn test_geojson_is_required() {
        assert!(Settings::try_parse_from(["pueblos-explorer"]).is_err());
    }
}
