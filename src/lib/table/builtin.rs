use crate::command::{
    CommandDescriptor as Cmd,
    ControlType::{self, Eight, Five, SetA, SetB, SetC, Zero},
    ParamSpec::{self, Any, GreaterThan as Gt, IntegerRange as Int, None as NoArg},
};

const ZERO: &[&str] = &[
    "Output",
    "Freeze",
    "Power",
    "AV1",
    "AV2",
    "Comp",
    "YC1",
    "YC2",
    "VGA1",
    "VGA2 (VP-724 DS/XL only)",
    "DVI",
    "Information",
    "Area Left Up",
    "Area Middle Up",
    "Area Right Up",
    "Area Left Center",
    "Area Middle Center",
    "Area Right Center",
    "Area Left Down",
    "Area Middle Down",
    "Area Right Down",
    "Auto Image",
    "Menu",
    "Up",
    "Left",
    "Enter",
    "Right",
    "Down",
    "Auto Gain",
    "PIP",
    "Swap",
    "Contrast",
    "Brightness",
    "Zoom In",
    "Zoom Out",
    "Volume Down",
    "Mute",
    "Volume Up",
    "Color Mode",
    "Aspect Ratio",
];

const SET_A: &[(Option<&str>, ParamSpec, &str)] = &[
    (Some("Gamma and Color"), Int(-10, 10), "User1 Gamma"),
    (Some("Gamma and Color"), Int(0, 127), "User1 Color Temp Red"),
    (Some("Gamma and Color"), Int(0, 127), "User1 Color Temp Green"),
    (Some("Gamma and Color"), Int(0, 127), "User1 Color Temp Blue"),
    (Some("Gamma and Color"), Int(0, 32), "User1 Color Manager Red"),
    (Some("Gamma and Color"), Int(0, 32), "User1 Color Manager Green"),
    (Some("Gamma and Color"), Int(0, 32), "User1 Color Manager Blue"),
    (Some("Gamma and Color"), Int(0, 32), "User1 Color Manager Yellow"),
    (Some("Gamma and Color"), Int(-10, 10), "User2 Gamma"),
    (Some("Gamma and Color"), Int(0, 127), "User2 Color Temp Red"),
    (Some("Gamma and Color"), Int(0, 127), "User2 Color Temp Green"),
    (Some("Gamma and Color"), Int(0, 127), "User2 Color Temp Blue"),
    (Some("Gamma and Color"), Int(0, 32), "User2 Color Manager Red"),
    (Some("Gamma and Color"), Int(0, 32), "User2 Color Manager Green"),
    (Some("Gamma and Color"), Int(0, 32), "User2 Color Manager Blue"),
    (Some("Gamma and Color"), Int(0, 32), "User2 Color Manager Yellow"),
    (None, Int(0, 127), "Brightness"),
    (None, Int(0, 127), "Contrast"),
    (Some("Aspect Ratio"), Int(-32, 32), "User Define H-Zoom"),
    (Some("Aspect Ratio"), Int(-32, 32), "User Define V-Zoom"),
    (Some("Aspect Ratio"), Int(-32, 32), "User Define H-Pan"),
    (Some("Aspect Ratio"), Int(-32, 32), "User Define V-Pan"),
    (Some("Graphics Setting"), Int(0, 255), "H-Position"),
    (Some("Graphics Setting"), Int(0, 255), "V-Position"),
    (Some("Graphics Setting"), Int(0, 127), "Color"),
    (Some("Graphics Setting"), Int(0, 127), "Hue"),
    (Some("Graphics Setting"), Int(0, 16), "Sharpness"),
    (Some("Graphics Setting"), Int(0, 100), "Frequency"),
    (Some("Graphics Setting"), Int(0, 31), "Phase"),
    (Some("Video Setting"), Int(0, 127), "Color"),
    (Some("Video Setting"), Int(0, 127), "Hue"),
    (Some("Video Setting"), Int(0, 16), "Sharpness"),
    (Some("Video Setting"), Int(0, 20), "H-Position"),
    (
        Some("Video Setting"),
        Int(0, 20),
        "V-Position (0~20 for NTSC/PAL-M/PAL 60, 0~39 for PAL/PAL-N/SECAM)",
    ),
    (Some("Audio Setting"), Int(0, 32), "Volume"),
    (Some("Audio Setting"), Int(0, 12), "Treble"),
    (Some("Audio Setting"), Int(0, 12), "Bass"),
    (Some("PIP Setting"), Int(0, 36), "H-Position"),
    (Some("PIP Setting"), Int(0, 36), "V-Position"),
    (Some("PIP Setting"), Int(0, 255), "User Define V-Size"),
    (Some("PIP Setting"), Int(0, 255), "User Define H-Size"),
    (Some("OSD Setting"), Int(0, 36), "H-Position"),
    (Some("OSD Setting"), Int(0, 36), "V-Position"),
    (Some("OSD Setting"), Int(3, 60), "OSD Time Out"),
    (Some("Output Timing"), Gt(100), "HT, H-Sync Cycle"),
    (Some("Output Timing"), Gt(0), "HW, H-Sync Width"),
    (Some("Output Timing"), Gt(0), "HS, Active Pixel Start"),
    (Some("Output Timing"), Any, "HA, Active Pixel"),
    (Some("Output Timing"), Int(0, 1), "HP, H-Sync Polarity"),
    (Some("Output Timing"), Gt(0), "VT, V-Sync Cycle"),
    (Some("Output Timing"), Gt(0), "VW, V-Sync Width"),
    (Some("Output Timing"), Gt(0), "VS, Active Line Start"),
    (Some("Output Timing"), Any, "VA, Active Line"),
    (Some("Output Timing"), Int(0, 1), "VP, V-Sync Polarity"),
    (Some("Output Timing"), Gt(100), "OCLK, Pixel Clock (value / 10 MHz)"),
];

const SOURCES: &[(&str, &str)] = &[
    ("0", "VGA-1"),
    ("1", "VGA-2"),
    ("2", "DVI"),
    ("3", "Component"),
    ("4", "YC-1"),
    ("5", "AV-1"),
    ("6", "YC-2"),
    ("7", "AV-2"),
    ("8", "Scart"),
    ("9", "TV"),
];

const OFF_ON: &[(&str, &str)] = &[("0", "Off"), ("1", "On")];
const COLOR_FORMATS: &[(&str, &str)] = &[("0", "Default"), ("1", "RGB"), ("2", "YUV")];

type Labelled = (Option<&'static str>, ParamSpec, &'static str, &'static [(&'static str, &'static str)]);

const SET_B: &[Labelled] = &[
    (None, Int(0, 9), "Select Input Source", SOURCES),
    (
        Some("Geometry"),
        Int(0, 5),
        "Video Aspect Ratio",
        &[
            ("0", "Normal"),
            ("1", "Wide Screen"),
            ("2", "Pan & Scan"),
            ("3", "4:3"),
            ("4", "16:9"),
            ("5", "User Define"),
        ],
    ),
    (
        Some("Geometry"),
        Int(0, 3),
        "Video Nonlinear",
        &[("0", "Off"), ("1", "Side"), ("2", "Middle")],
    ),
    (
        Some("Geometry"),
        Int(0, 5),
        "VGA Aspect Ratio",
        &[
            ("0", "Full Screen"),
            ("1", "Native"),
            ("2", "Nonlinear"),
            ("3", "4:3"),
            ("4", "16:9"),
            ("5", "User Define"),
        ],
    ),
    (Some("Zoom"), Int(0, 10), "Zoom Ratio", &[("0", "Off"), ("10", "400%")]),
    (Some("Graphics Setting"), Int(0, 2), "Color Format", COLOR_FORMATS),
    (Some("Video Setting"), Int(0, 2), "Color Format", COLOR_FORMATS),
    (
        Some("Video Setting"),
        Int(0, 6),
        "Video Standard",
        &[
            ("0", "Auto"),
            ("1", "NTSC"),
            ("2", "NTSC 4.43"),
            ("3", "PAL"),
            ("4", "PAL-N"),
            ("5", "PAL-M"),
            ("6", "SECAM"),
        ],
    ),
    (Some("Video Setting"), Int(0, 1), "Film Mode", OFF_ON),
    (Some("Audio Setting"), Int(0, 1), "Stereo", OFF_ON),
    (Some("PIP Setting"), Int(0, 1), "PIP On/Off", OFF_ON),
    (Some("PIP Setting"), Int(0, 9), "PIP Source", SOURCES),
    (
        Some("PIP Setting"),
        Int(0, 5),
        "PIP Size",
        &[
            ("0", "1/25"),
            ("1", "1/16"),
            ("2", "1/9"),
            ("3", "1/4"),
            ("4", "Split"),
            ("5", "User Define"),
        ],
    ),
    (Some("PIP Setting"), Int(0, 5), "PIP Frame", OFF_ON),
    (
        Some("Seamless Switch"),
        Int(0, 2),
        "Mode",
        &[("0", "Fast"), ("1", "Moderate"), ("2", "Safe")],
    ),
    (
        Some("Seamless Switch"),
        Int(0, 2),
        "Background",
        &[("0", "Black"), ("1", "Blue"), ("2", "Disable Analog Syncs")],
    ),
    (Some("Seamless Switch"), Int(0, 2), "Auto Search", OFF_ON),
    (Some("OSD Setting"), Int(0, 1), "Startup Logo", OFF_ON),
    (
        Some("OSD Setting"),
        Int(0, 1),
        "Size",
        &[("0", "Normal"), ("1", "Double")],
    ),
    (Some("OSD Setting"), Int(0, 1), "Source Prompt", OFF_ON),
    (
        Some("OSD Setting"),
        Int(0, 1),
        "Blank Color",
        &[("0", "Blue"), ("1", "Black")],
    ),
    (
        None,
        Int(0, 17),
        "Output Resolution",
        &[
            ("0", "640x480"),
            ("1", "800x600"),
            ("2", "1024x768"),
            ("3", "1280x1024"),
            ("4", "1600x1200"),
            ("5", "852x1024i"),
            ("6", "1024x1024i"),
            ("7", "1366x768"),
            ("8", "1365x1024"),
            ("9", "1280x720"),
            ("10", "720x483"),
            ("11", "852x480"),
            ("12", "1400x1050"),
            ("13", "480P"),
            ("14", "720P"),
            ("15", "1080i"),
            ("16", "576P"),
            ("17", "1080P"),
            ("18", "1280x768"),
            ("19", "User Define"),
        ],
    ),
    (
        None,
        Int(0, 3),
        "Output Refresh Rate",
        &[("0", "60Hz"), ("1", "75Hz"), ("2", "85Hz"), ("3", "50Hz")],
    ),
    (
        None,
        Int(0, 1),
        "Factory Reset",
        &[("0", "Cancel"), ("1", "OK")],
    ),
    (
        Some("Advanced"),
        Int(0, 3),
        "Input Button",
        &[
            ("0", "Freeze/Blank"),
            ("1", "Freeze"),
            ("2", "Blank"),
            ("3", "Ignore"),
        ],
    ),
    (None, Int(0, 1), "Key Lock Save", &[]),
    (None, Int(0, 1), "Input Lock", &[]),
    (
        None,
        Int(0, 1),
        "SOG Setting (KI239 only)",
        &[("0", "Auto"), ("1", "RGsB"), ("2", "DTV")],
    ),
    (
        None,
        Int(0, 1),
        "Enable OSD Timeout",
        &[("0", "Disable"), ("1", "Enable")],
    ),
    (
        None,
        Int(0, 2),
        "Output Mode User Defined Parameter Group",
        &[("0", "Group 1"), ("1", "Group 2"), ("2", "Group 3")],
    ),
    (
        None,
        Int(0, 2),
        "Audio Volume/Treble/Bass Saving",
        &[("0", "Master"), ("1", "Individual"), ("2", "Linked")],
    ),
];

const FIVE: &[&str] = &["Normal", "Presentation", "Cinema", "Nature", "User1", "User2"];

const SET_C: &[(&str, &[(&str, &str)])] = &[
    ("Power", &[("0", "Power Down"), ("1", "Power On")]),
    ("Freeze", OFF_ON),
    ("Blank", OFF_ON),
    ("Mute", OFF_ON),
    ("Key Lock", OFF_ON),
];

fn labelled(
    control_type: ControlType,
    function_code: usize,
    group: Option<&str>,
    spec: ParamSpec,
    description: &str,
    values: &[(&str, &str)],
) -> Cmd {
    let mut cmd = Cmd::new(control_type, function_code as u16, spec, description);
    if let Some(group) = group {
        cmd = cmd.group(group);
    }
    if !values.is_empty() {
        cmd = cmd.values(values);
    }
    cmd
}

/// Compiled-in table of the VP-719xl/720xl/724xl command set.
pub fn builtin_commands() -> Vec<Cmd> {
    let mut commands = Vec::new();

    commands.extend(
        ZERO.iter()
            .enumerate()
            .map(|(fc, desc)| labelled(Zero, fc, Some("Buttons"), NoArg, desc, &[])),
    );
    commands.extend(
        SET_A
            .iter()
            .enumerate()
            .map(|(fc, &(group, spec, desc))| labelled(SetA, fc, group, spec, desc, &[])),
    );
    commands.extend(
        SET_B
            .iter()
            .enumerate()
            .map(|(fc, &(group, spec, desc, values))| labelled(SetB, fc, group, spec, desc, values)),
    );
    commands.extend(FIVE.iter().enumerate().map(|(fc, desc)| {
        labelled(Five, fc, Some("Load Gamma/Color"), NoArg, desc, &[])
    }));
    commands.extend(
        SET_C
            .iter()
            .enumerate()
            .map(|(fc, &(desc, values))| labelled(SetC, fc, None, Int(0, 1), desc, values)),
    );
    commands.push(
        Cmd::new(Eight, 0, NoArg, "Resolution/Refresh Rate or Video Standard")
            .group("Status"),
    );

    commands
}
