mod bvh_queries;
mod triangle_ray_cast;
