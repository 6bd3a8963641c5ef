//! Fallback data used when no boundary file or intel feed is available.

use crate::map::{Asset, Region, Relationship, SeverityIndex, Tier};

type Outline = &'static [(f64, f64)];

/// Coarse outlines of the monitored countries: (id, name, rings)
const OUTLINES: &[(&str, &str, &[Outline])] = &[
    (
        "UKR",
        "Ukraine",
        &[&[
            (22.1, 48.4), (24.0, 50.6), (23.6, 51.6), (30.6, 51.3), (32.1, 52.1),
            (34.4, 51.8), (35.4, 50.6), (38.2, 50.0), (40.1, 49.6), (39.7, 47.8),
            (38.2, 47.1), (35.2, 46.3), (33.6, 44.4), (32.5, 45.4), (30.8, 46.5),
            (29.6, 45.4), (28.2, 45.5), (28.7, 48.1), (26.6, 48.3), (22.1, 48.4),
        ]],
    ),
    (
        "RUS",
        "Russia",
        &[&[
            (27.8, 56.8), (31.8, 52.1), (34.4, 51.8), (38.2, 50.0), (40.1, 49.6),
            (39.7, 47.8), (38.2, 47.1), (40.0, 43.4), (47.5, 41.2), (48.6, 45.8),
            (50.0, 51.6), (61.0, 51.0), (69.0, 55.0), (80.0, 50.8), (87.3, 49.1),
            (98.0, 52.0), (108.0, 49.5), (117.0, 49.6), (120.0, 52.6), (127.5, 49.7),
            (134.7, 48.3), (131.0, 42.6), (140.0, 48.0), (141.0, 53.0), (135.0, 55.0),
            (143.0, 59.3), (156.0, 61.0), (163.0, 60.0), (156.7, 51.0), (162.0, 55.0),
            (164.0, 60.0), (177.0, 62.5), (180.0, 65.0), (180.0, 68.9), (160.0, 69.6),
            (140.0, 72.5), (113.0, 73.7), (105.0, 77.5), (87.0, 75.0), (80.0, 73.5),
            (72.5, 72.8), (68.5, 68.1), (60.0, 69.8), (50.0, 68.0), (43.0, 68.5),
            (40.0, 66.0), (33.0, 69.3), (30.0, 69.7), (28.3, 68.0), (30.0, 62.0),
            (28.0, 60.5), (27.8, 56.8),
        ]],
    ),
    (
        "BLR",
        "Belarus",
        &[&[
            (23.5, 53.9), (23.9, 52.7), (23.2, 52.2), (23.6, 51.6), (30.6, 51.3),
            (31.8, 52.1), (31.5, 53.2), (32.7, 53.4), (30.8, 54.8), (30.9, 55.6),
            (28.2, 56.2), (26.5, 55.6), (25.7, 54.3), (23.5, 53.9),
        ]],
    ),
    (
        "POL",
        "Poland",
        &[&[
            (14.1, 52.9), (14.6, 51.0), (17.0, 50.4), (18.9, 49.4), (22.6, 49.1),
            (24.0, 50.6), (23.6, 51.6), (23.2, 52.2), (23.9, 52.7), (23.5, 53.9),
            (22.8, 54.4), (19.7, 54.4), (18.6, 54.7), (14.2, 53.9), (14.1, 52.9),
        ]],
    ),
    (
        "TUR",
        "Turkey",
        &[&[
            (26.0, 40.8), (26.6, 41.6), (28.0, 42.0), (29.2, 41.2), (31.1, 41.1),
            (35.2, 42.0), (38.3, 40.9), (41.6, 41.5), (43.6, 41.1), (44.8, 39.7),
            (44.0, 39.4), (44.3, 37.0), (42.35, 37.2), (40.7, 37.1), (38.2, 36.9),
            (36.7, 36.8), (36.2, 36.0), (35.6, 36.6), (32.5, 36.1), (30.6, 36.7),
            (29.0, 36.5), (27.3, 37.4), (26.3, 38.2), (26.8, 39.0), (26.0, 40.8),
        ]],
    ),
    (
        "SYR",
        "Syria",
        &[&[
            (35.7, 32.7), (35.9, 35.4), (36.1, 35.8), (35.8, 36.3), (36.7, 36.8),
            (38.2, 36.9), (40.7, 37.1), (42.35, 37.2), (41.3, 36.4), (41.0, 34.4),
            (38.8, 33.4), (36.8, 32.3), (35.7, 32.7),
        ]],
    ),
    (
        "ISR",
        "Israel",
        &[&[
            (34.27, 31.22), (34.9, 29.5), (35.1, 30.0), (35.4, 31.1), (35.0, 31.4),
            (34.95, 32.0), (35.0, 32.5), (35.55, 32.4), (35.8, 33.3), (35.1, 33.1),
            (34.5, 31.6), (34.27, 31.22),
        ]],
    ),
    (
        "PSE",
        "Palestine",
        &[
            &[
                (35.0, 31.4), (35.5, 31.4), (35.55, 32.4), (35.0, 32.5), (34.95, 32.0),
                (35.0, 31.4),
            ],
            &[(34.2, 31.2), (34.5, 31.6), (34.55, 31.5), (34.27, 31.22), (34.2, 31.2)],
        ],
    ),
    (
        "EGY",
        "Egypt",
        &[&[
            (25.0, 22.0), (25.0, 31.6), (29.0, 30.9), (31.2, 31.6), (32.2, 31.3),
            (34.2, 31.2), (34.9, 29.5), (33.0, 28.2), (32.4, 29.9), (32.7, 28.7),
            (34.4, 25.9), (35.7, 23.9), (36.9, 22.0), (31.4, 22.0), (25.0, 22.0),
        ]],
    ),
    (
        "SAU",
        "Saudi Arabia",
        &[&[
            (34.6, 28.1), (36.5, 29.5), (37.7, 30.3), (38.0, 31.5), (39.2, 32.2),
            (42.0, 31.0), (44.7, 29.2), (47.5, 29.0), (48.4, 28.6), (50.1, 26.7),
            (51.6, 24.2), (55.0, 22.5), (55.7, 22.0), (52.0, 19.0), (49.1, 18.6),
            (47.0, 17.0), (46.4, 17.2), (43.4, 17.6), (42.6, 16.4), (40.9, 19.5),
            (39.1, 21.3), (38.5, 23.7), (37.5, 24.3), (35.1, 28.1), (34.6, 28.1),
        ]],
    ),
    (
        "YEM",
        "Yemen",
        &[&[
            (42.6, 16.4), (43.2, 13.2), (45.0, 12.8), (48.7, 14.0), (52.2, 15.6),
            (53.1, 16.7), (52.0, 19.0), (49.1, 18.6), (47.0, 17.0), (46.4, 17.2),
            (43.4, 17.6), (42.6, 16.4),
        ]],
    ),
    (
        "IRN",
        "Iran",
        &[&[
            (44.0, 39.4), (44.8, 37.2), (45.4, 35.9), (46.1, 35.1), (45.6, 34.0),
            (47.7, 31.0), (48.5, 29.9), (50.1, 30.1), (51.5, 27.9), (54.7, 26.5),
            (57.4, 25.7), (61.6, 25.1), (63.3, 27.2), (61.8, 30.7), (60.5, 33.7),
            (61.2, 35.6), (59.2, 37.4), (56.2, 38.1), (54.0, 37.4), (53.9, 36.9),
            (51.0, 36.8), (48.9, 38.4), (48.0, 38.8), (44.0, 39.4),
        ]],
    ),
    (
        "AFG",
        "Afghanistan",
        &[&[
            (61.2, 35.6), (62.2, 35.3), (63.2, 35.9), (65.0, 37.2), (67.8, 37.1),
            (70.1, 37.6), (71.5, 37.9), (74.9, 37.4), (71.3, 36.1), (71.5, 34.0),
            (69.9, 34.0), (70.3, 33.4), (69.3, 31.9), (66.9, 31.3), (66.4, 29.9),
            (62.6, 29.3), (60.9, 29.8), (61.8, 30.7), (60.5, 33.7), (61.2, 35.6),
        ]],
    ),
    (
        "SDN",
        "Sudan",
        &[&[
            (21.8, 12.6), (22.0, 15.7), (24.0, 15.7), (24.0, 20.0), (25.0, 20.0),
            (25.0, 22.0), (31.4, 22.0), (36.9, 22.0), (37.4, 18.6), (38.5, 18.0),
            (36.4, 14.4), (36.3, 13.0), (34.0, 11.2), (34.1, 9.5), (33.0, 10.0),
            (31.3, 9.8), (30.0, 10.3), (27.0, 9.6), (24.2, 8.7), (23.0, 10.7),
            (21.8, 12.6),
        ]],
    ),
    (
        "ETH",
        "Ethiopia",
        &[&[
            (33.0, 8.0), (34.1, 9.5), (35.3, 12.1), (36.5, 14.3), (37.9, 14.96),
            (40.0, 14.5), (42.3, 12.5), (41.7, 11.1), (43.3, 9.5), (44.9, 8.0),
            (47.8, 8.0), (45.0, 5.0), (42.0, 4.0), (41.0, 4.0), (39.6, 3.4),
            (36.0, 4.4), (35.3, 5.5), (34.0, 7.2), (33.0, 8.0),
        ]],
    ),
    (
        "COD",
        "DR Congo",
        &[&[
            (12.2, -6.0), (13.0, -5.9), (16.3, -5.9), (17.5, -8.1), (19.4, -8.0),
            (21.9, -9.5), (22.2, -11.1), (24.0, -11.0), (25.4, -11.3), (27.4, -12.1),
            (28.9, -13.2), (29.6, -12.2), (29.3, -8.2), (30.8, -8.3), (29.2, -6.0),
            (29.4, -4.4), (29.0, -2.8), (29.6, -1.3), (29.6, 0.6), (31.2, 2.2),
            (30.8, 3.5), (29.7, 4.6), (27.4, 5.2), (25.1, 5.0), (22.4, 4.0),
            (20.9, 4.3), (18.5, 4.2), (17.1, 3.7), (16.0, 2.3), (17.8, -0.4),
            (16.4, -1.7), (15.2, -4.3), (12.3, -5.8), (12.2, -6.0),
        ]],
    ),
    (
        "MMR",
        "Myanmar",
        &[&[
            (92.3, 21.0), (93.1, 22.7), (93.4, 24.1), (94.6, 25.2), (95.2, 26.7),
            (97.3, 27.9), (98.7, 25.9), (98.1, 24.1), (99.5, 22.1), (101.2, 21.4),
            (100.1, 20.4), (98.3, 19.7), (97.4, 18.4), (98.9, 16.2), (98.5, 13.1),
            (99.2, 10.0), (98.5, 10.7), (97.8, 14.8), (97.2, 16.9), (95.4, 15.7),
            (94.2, 16.0), (94.6, 18.2), (92.3, 21.0),
        ]],
    ),
    (
        "CHN",
        "China",
        &[&[
            (73.5, 39.4), (75.0, 37.4), (78.9, 34.3), (78.8, 31.5), (81.1, 30.2),
            (86.0, 27.9), (88.8, 27.3), (92.1, 26.9), (97.3, 28.2), (98.7, 25.9),
            (98.1, 24.1), (99.5, 22.1), (101.7, 21.2), (106.7, 22.8), (108.0, 21.5),
            (110.4, 20.3), (113.8, 22.5), (117.3, 23.6), (119.6, 25.7), (121.9, 30.9),
            (120.3, 34.3), (119.2, 35.0), (122.5, 37.4), (121.4, 39.8), (124.3, 40.0),
            (126.9, 41.8), (130.6, 42.4), (131.0, 44.8), (133.1, 48.1), (127.5, 49.7),
            (120.0, 52.6), (117.0, 49.6), (116.7, 47.9), (111.9, 43.7), (105.0, 41.6),
            (96.3, 42.7), (95.3, 44.2), (90.9, 45.3), (87.8, 49.3), (85.8, 47.0),
            (82.7, 45.4), (80.2, 42.1), (76.2, 40.4), (73.5, 39.4),
        ]],
    ),
    (
        "TWN",
        "Taiwan",
        &[&[
            (120.1, 23.0), (120.7, 22.0), (121.5, 22.8), (121.9, 24.9), (121.5, 25.3),
            (120.7, 24.5), (120.1, 23.0),
        ]],
    ),
    (
        "USA",
        "United States of America",
        &[&[
            (-124.7, 48.4), (-124.2, 42.0), (-120.6, 34.6), (-117.1, 32.5), (-114.7, 32.7),
            (-111.0, 31.3), (-106.5, 31.8), (-103.0, 29.0), (-99.5, 27.5), (-97.1, 25.9),
            (-97.4, 27.9), (-93.8, 29.7), (-89.6, 29.3), (-88.0, 30.7), (-84.9, 29.7),
            (-82.7, 27.5), (-81.0, 25.2), (-80.0, 26.9), (-81.4, 30.7), (-75.5, 35.2),
            (-76.0, 37.0), (-74.0, 40.5), (-70.0, 41.7), (-70.7, 43.1), (-67.0, 44.8),
            (-69.2, 47.4), (-71.5, 45.0), (-76.5, 44.2), (-79.0, 43.3), (-82.5, 41.7),
            (-83.1, 42.3), (-82.4, 45.3), (-84.7, 46.5), (-88.4, 48.3), (-95.2, 49.0),
            (-123.0, 49.0), (-124.7, 48.4),
        ]],
    ),
];

/// Capitals plus a handful of strategic hubs and tactical nodes: (name, lon, lat, tier, type)
const ASSETS: &[(&str, f64, f64, u8, &str)] = &[
    ("Kabul", 69.2075, 34.5553, 1, "Capital"),
    ("Tirana", 19.8187, 41.3275, 1, "Capital"),
    ("Algiers", 3.0588, 36.7538, 1, "Capital"),
    ("Andorra la Vella", 1.5218, 42.5063, 1, "Capital"),
    ("Luanda", 13.2344, -8.8383, 1, "Capital"),
    ("Buenos Aires", -58.3816, -34.6037, 1, "Capital"),
    ("Yerevan", 44.5152, 40.1872, 1, "Capital"),
    ("Canberra", 149.1300, -35.2809, 1, "Capital"),
    ("Vienna", 16.3738, 48.2082, 1, "Capital"),
    ("Baku", 49.8671, 40.4093, 1, "Capital"),
    ("Nassau", -77.3554, 25.0443, 1, "Capital"),
    ("Manama", 50.5860, 26.2285, 1, "Capital"),
    ("Dhaka", 90.4125, 23.8103, 1, "Capital"),
    ("Bridgetown", -59.6167, 13.0975, 1, "Capital"),
    ("Minsk", 27.5615, 53.9045, 1, "Capital"),
    ("Brussels", 4.3517, 50.8503, 1, "Capital"),
    ("Belmopan", -88.7713, 17.2510, 1, "Capital"),
    ("Porto-Novo", 2.6289, 6.4969, 1, "Capital"),
    ("Thimphu", 89.6390, 27.4728, 1, "Capital"),
    ("La Paz", -68.1193, -16.4897, 1, "Capital"),
    ("Sarajevo", 18.4131, 43.8563, 1, "Capital"),
    ("Gaborone", 25.9231, -24.6282, 1, "Capital"),
    ("Brasília", -47.8825, -15.7939, 1, "Capital"),
    ("Sofia", 23.3219, 42.6977, 1, "Capital"),
    ("Ouagadougou", -1.5197, 12.3714, 1, "Capital"),
    ("Gitega", 29.9246, -3.4264, 1, "Capital"),
    ("Phnom Penh", 104.9282, 11.5564, 1, "Capital"),
    ("Yaoundé", 11.5021, 3.8480, 1, "Capital"),
    ("Ottawa", -75.6972, 45.4215, 1, "Capital"),
    ("Praia", -23.5087, 14.9330, 1, "Capital"),
    ("Bangui", 18.5582, 4.3947, 1, "Capital"),
    ("N'Djamena", 15.0557, 12.1348, 1, "Capital"),
    ("Santiago", -70.6693, -33.4489, 1, "Capital"),
    ("Beijing", 116.4074, 39.9042, 1, "Capital"),
    ("Bogotá", -74.0721, 4.7110, 1, "Capital"),
    ("Moroni", 43.2551, -11.7172, 1, "Capital"),
    ("San José", -84.0907, 9.9281, 1, "Capital"),
    ("Zagreb", 15.9819, 45.8150, 1, "Capital"),
    ("Havana", -82.3666, 23.1136, 1, "Capital"),
    ("Nicosia", 33.3823, 35.1856, 1, "Capital"),
    ("Prague", 14.4378, 50.0755, 1, "Capital"),
    ("Copenhagen", 12.5683, 55.6761, 1, "Capital"),
    ("Djibouti", 43.1456, 11.8251, 1, "Capital"),
    ("Roseau", -61.3794, 15.3092, 1, "Capital"),
    ("Santo Domingo", -69.9312, 18.4861, 1, "Capital"),
    ("Quito", -78.4678, -0.1807, 1, "Capital"),
    ("Cairo", 31.2357, 30.0444, 1, "Capital"),
    ("San Salvador", -89.2182, 13.6929, 1, "Capital"),
    ("Malabo", 8.7832, 3.7504, 1, "Capital"),
    ("Asmara", 38.9251, 15.3229, 1, "Capital"),
    ("Tallinn", 24.7536, 59.4370, 1, "Capital"),
    ("London", -0.1276, 51.5074, 1, "Capital"),
    ("Washington D.C.", -77.0369, 38.9072, 1, "Capital"),
    ("Kyiv", 30.5234, 50.4501, 1, "Capital"),
    ("Sana'a", 44.2075, 15.3694, 1, "Capital"),
    ("Odesa", 30.7233, 46.4825, 2, "Port"),
    ("Kharkiv", 36.2304, 49.9935, 2, "Logistics"),
    ("Port Sudan", 37.2164, 19.6158, 2, "Port"),
    ("Aden", 45.0357, 12.7797, 2, "Port"),
    ("Bandar Abbas", 56.2666, 27.1832, 2, "Port"),
    ("Goma", 29.2205, -1.6585, 3, "Tactical"),
    ("El Fasher", 25.3494, 13.6279, 3, "Tactical"),
    ("Hodeidah", 42.9511, 14.7978, 3, "Tactical"),
    ("Bakhmut", 38.0003, 48.5947, 3, "Tactical"),
    ("Mandalay", 96.0891, 21.9588, 3, "Tactical"),
];

/// Conflict severity scores by region id
const SEVERITY: &[(&str, f64)] = &[
    ("UKR", 96.0),
    ("RUS", 88.0),
    ("SDN", 92.0),
    ("PSE", 98.0),
    ("ISR", 94.0),
    ("YEM", 82.0),
    ("MMR", 85.0),
    ("ETH", 78.0),
    ("SYR", 89.0),
    ("AFG", 75.0),
    ("COD", 81.0),
    ("TWN", 68.0),
    ("IRN", 65.0),
    ("USA", 20.0),
    ("CHN", 45.0),
];

/// (id, source, target, type, description)
const RELATIONSHIPS: &[(&str, &str, &str, &str, &str)] = &[
    ("c1", "IRN", "YEM", "ARMS_FLOW", "Drone and missile components routed to Houthi forces"),
    ("c2", "IRN", "SYR", "PROXY_WAR", "Advisory presence and militia funding"),
    ("c3", "USA", "UKR", "ARMS_FLOW", "Air defense and artillery packages"),
    ("c4", "RUS", "BLR", "ALLIANCE", "Union State force integration"),
    ("c5", "CHN", "RUS", "ALLIANCE", "Dual-use trade corridor"),
    ("c6", "RUS", "UKR", "CYBER", "Grid and telecom intrusion campaign"),
    ("c7", "SDN", "ETH", "SPILLOVER", "Refugee flows across the eastern border"),
    ("c8", "YEM", "SAU", "SPILLOVER", "Cross-border missile strikes"),
    ("c9", "CHN", "TWN", "CYBER", "Persistent intrusion on government networks"),
    ("c10", "IRN", "ISR", "PROXY_WAR", "Support to armed groups on the northern front"),
    ("c11", "USA", "ISR", "ALLIANCE", "Security assistance"),
    ("c12", "AFG", "IRN", "SPILLOVER", "Border clashes and displacement"),
];

pub fn regions() -> Vec<Region> {
    OUTLINES
        .iter()
        .filter_map(|(id, name, rings)| {
            let rings = rings.iter().map(|ring| ring.to_vec()).collect();
            Region::from_rings(id, name, rings)
        })
        .collect()
}

pub fn assets() -> Vec<Asset> {
    ASSETS
        .iter()
        .filter_map(|&(name, lon, lat, tier, category)| {
            let tier = Tier::try_from(tier).ok()?;
            Some(Asset::new(name, lon, lat, tier, category))
        })
        .collect()
}

pub fn severity() -> SeverityIndex {
    SEVERITY.iter().copied().collect()
}

pub fn relationships() -> Vec<Relationship> {
    RELATIONSHIPS
        .iter()
        .map(|&(id, source, target, category, description)| {
            Relationship::new(id, source, target, category, description)
        })
        .collect()
}
