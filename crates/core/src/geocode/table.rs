/// Built-in gazetteer: lowercase place name → (latitude, longitude).
///
/// Substring fallback walks this slice front to back and takes the first hit,
/// so entry order is part of the lookup behaviour.
pub const PLACES: &[(&str, (f64, f64))] = &[
    // Cities
    ("алматы", (43.2389, 76.8897)),
    ("астана", (51.1694, 71.4491)),
    ("нур-султан", (51.1694, 71.4491)),
    ("шымкент", (42.3417, 69.5901)),
    ("караганда", (49.8047, 73.1094)),
    ("актобе", (50.2839, 57.1670)),
    ("тараз", (42.9000, 71.3667)),
    ("павлодар", (52.2873, 76.9674)),
    ("усть-каменогорск", (49.9483, 82.6279)),
    ("семей", (50.4111, 80.2275)),
    ("атырау", (47.1167, 51.8833)),
    ("костанай", (53.2144, 63.6246)),
    ("кызылорда", (44.8488, 65.4823)),
    ("уральск", (51.2333, 51.3667)),
    ("петропавловск", (54.8753, 69.1628)),
    ("актау", (43.6500, 51.1667)),
    ("темиртау", (50.0549, 72.9646)),
    ("туркестан", (43.2973, 68.2518)),
    ("кокшетау", (53.2833, 69.4000)),
    ("талдыкорган", (45.0156, 78.3739)),
    ("экибастуз", (51.7298, 75.3266)),
    ("жезказган", (47.7833, 67.7667)),
    ("балхаш", (46.8481, 74.9950)),
    ("байконур", (45.6167, 63.3167)),
    ("конаев", (43.8667, 77.0667)),
    ("капчагай", (43.8667, 77.0667)),
    ("есик", (43.3553, 77.4522)),
    ("талгар", (43.3030, 77.2400)),
    ("каскелен", (43.2000, 76.6200)),
    // Landmarks and natural sites
    ("медеу", (43.1573, 77.0586)),
    ("шымбулак", (43.1280, 77.0800)),
    ("чимбулак", (43.1280, 77.0800)),
    ("чарын", (43.3500, 79.0833)),
    ("бурабай", (53.0833, 70.3000)),
    ("боровое", (53.0833, 70.3000)),
    ("алаколь", (46.1667, 81.6667)),
    ("кольсай", (42.9333, 78.3167)),
    ("каинды", (42.9847, 78.4653)),
    ("тамгалы", (43.8033, 75.5344)),
    // Latin spellings
    ("almaty", (43.2389, 76.8897)),
    ("astana", (51.1694, 71.4491)),
    ("shymkent", (42.3417, 69.5901)),
    ("karaganda", (49.8047, 73.1094)),
    ("aktobe", (50.2839, 57.1670)),
    ("taraz", (42.9000, 71.3667)),
    ("pavlodar", (52.2873, 76.9674)),
    ("semey", (50.4111, 80.2275)),
    ("atyrau", (47.1167, 51.8833)),
    ("kostanay", (53.2144, 63.6246)),
    ("kyzylorda", (44.8488, 65.4823)),
    ("aktau", (43.6500, 51.1667)),
    ("turkistan", (43.2973, 68.2518)),
    ("kokshetau", (53.2833, 69.4000)),
    ("taldykorgan", (45.0156, 78.3739)),
    ("medeu", (43.1573, 77.0586)),
    ("charyn", (43.3500, 79.0833)),
    ("burabay", (53.0833, 70.3000)),
    // Neighbouring capitals
    ("бишкек", (42.8746, 74.5698)),
    ("ташкент", (41.2995, 69.2401)),
    ("москва", (55.7558, 37.6173)),
    ("bishkek", (42.8746, 74.5698)),
    ("tashkent", (41.2995, 69.2401)),
    ("moscow", (55.7558, 37.6173)),
];
