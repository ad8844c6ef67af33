pub const TEMPLATE_FILE_NAME: &str = "zone_template.csv";

/// Example upload. Column order and header names are what the detector
/// recognises most reliably; any extra columns are ignored.
pub const TEMPLATE_CSV: &str = "\
pincode,zone,isOda
110001,N1,false
110002,N1,false
122001,N2,false
400001,W1,false
411001,W2,false
560001,S1,false
700001,E1,false
744101,X1,true
";
